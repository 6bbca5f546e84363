use std::mem;

use thiserror::Error;

use crate::{
    ast::{BinOp, Expr, Token, TokenKind, literals},
    lexer::{LexError, Lexer},
};

/// Malformed query text. Parsing is all-or-nothing: no partial tree is
/// ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} '{lexeme}' at offset {offset}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        lexeme: String,
        offset: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },
}

/// Recursive descent parser with one token of lookahead.
///
/// ```text
/// orExpr    := andExpr (OR andExpr)*
/// andExpr   := unaryExpr (AND unaryExpr)*
/// unaryExpr := NOT primary | primary
/// primary   := '(' orExpr ')'
///            | operand (cmpOp operand | MATCH REGEXP | LIKE STRING | IN (ARRAY|STRING|KEY))?
/// operand   := KEY | STRING | NUMBER | BOOLEAN | NULL | NOW | REGEXP | array
/// array     := '[' (operand (',' operand)*)? ']'
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>, ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.current_token.kind {
            TokenKind::Eof => ParseError::UnexpectedEnd { expected },
            found => ParseError::UnexpectedToken {
                expected,
                found,
                lexeme: self.current_token.lexeme.to_string(),
                offset: self.current_token.offset,
            },
        }
    }

    /// Parse a complete query.
    ///
    /// Returns `None` for a query without tokens.
    pub fn parse(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.check(TokenKind::Eof) {
            return Ok(None);
        }
        let expr = self.parse_or()?;
        self.expect(TokenKind::Eof, "AND, OR or end of input")?;
        Ok(Some(expr))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(TokenKind::Or) {
            self.advance()?;
            let right = self.parse_and()?;
            left = Expr::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while self.check(TokenKind::And) {
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Not) {
            self.advance()?;
            let operand = self.parse_primary()?;
            return Ok(Expr::not(operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::LParen) {
            self.advance()?;
            let expr = self.parse_or()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(expr);
        }

        let left = self.parse_operand()?;

        let op = match self.current_token.kind {
            TokenKind::Equal => BinOp::Equal,
            TokenKind::NotEqual => BinOp::NotEqual,
            TokenKind::Lt => BinOp::LessThan,
            TokenKind::Lte => BinOp::LessEqual,
            TokenKind::Gt => BinOp::GreaterThan,
            TokenKind::Gte => BinOp::GreaterEqual,
            TokenKind::Contains => BinOp::Contains,
            TokenKind::In => BinOp::In,
            TokenKind::Like => BinOp::Like,
            TokenKind::Match => BinOp::Match,
            // Bare operand: implicit truthiness test
            TokenKind::And | TokenKind::Or | TokenKind::RParen | TokenKind::Eof => {
                return Ok(left);
            }
            _ => return Err(self.unexpected("comparison operator, AND, OR, ')' or end of input")),
        };
        self.advance()?;

        let right = match op {
            BinOp::Match => {
                let token = self.expect(TokenKind::Regexp, "REGEXP")?;
                Expr::Regexp(token.lexeme.to_string())
            }
            BinOp::Like => {
                let token = self.expect(TokenKind::String, "STRING")?;
                Expr::String(token.lexeme.to_string())
            }
            BinOp::In => match self.current_token.kind {
                TokenKind::LBracket | TokenKind::String | TokenKind::Key => self.parse_operand()?,
                _ => return Err(self.unexpected("ARRAY, STRING or KEY")),
            },
            _ => self.parse_operand()?,
        };

        Ok(Expr::binary(op, left, right))
    }

    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let token = self.current_token;
        let expr = match token.kind {
            TokenKind::Key => Expr::Field(key_name(token.lexeme)),
            TokenKind::String => Expr::String(token.lexeme.to_string()),
            TokenKind::Regexp => Expr::Regexp(token.lexeme.to_string()),
            TokenKind::Number => {
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| self.unexpected("finite NUMBER"))?;
                Expr::Number(value)
            }
            TokenKind::Boolean => Expr::Boolean(token.lexeme.eq_ignore_ascii_case("true")),
            TokenKind::Null => Expr::Null,
            TokenKind::Now => Expr::Now,
            TokenKind::LBracket => return self.parse_array(),
            _ => return Err(self.unexpected("KEY, STRING, NUMBER, BOOLEAN, NULL, NOW, REGEXP or '['")),
        };
        self.advance()?;
        Ok(expr)
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = vec![];

        if self.check(TokenKind::RBracket) {
            self.advance()?;
            return Ok(Expr::Array(elements));
        }

        loop {
            elements.push(self.parse_operand()?);

            if self.check(TokenKind::Comma) {
                self.advance()?;
            } else {
                self.expect(TokenKind::RBracket, "',' or ']'")?;
                break;
            }
        }
        Ok(Expr::Array(elements))
    }
}

/// Field path named by a KEY lexeme: backtick keys are unquoted, bare
/// identifiers are taken as written.
fn key_name(lexeme: &str) -> String {
    if lexeme.starts_with('`') {
        literals::unquote(lexeme)
    } else {
        lexeme.to_string()
    }
}
