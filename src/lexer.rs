use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Which spellings of a field reference the lexer accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Backtick keys and bare identifiers (`age`, `users.age`, `` `a b` ``)
    #[default]
    Extended,
    /// Backtick keys only
    Strict,
}

/// A byte the lexer has no rule for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character '{found}' at offset {offset}")]
pub struct LexError {
    pub offset: usize,
    pub found: char,
}

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    Whitespace,
    Token(TokenKind),
    /// Like `Token`, but only when not followed by an identifier character
    Keyword(TokenKind),
    /// Bare identifier, `Extended` dialect only
    BareKey,
}

struct Rule {
    kind: RuleKind,
    pattern: Regex,
}

/// Rules in priority order. Multi-character operators precede their
/// single-character prefixes and keywords precede bare identifiers.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use RuleKind::*;
    use TokenKind as T;

    let table: &[(RuleKind, &str)] = &[
        (Whitespace, r"^\s+"),
        (Token(T::Number), r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?"),
        (Keyword(T::Boolean), r"(?i)^(?:TRUE|FALSE)"),
        (Keyword(T::Null), r"(?i)^(?:NULL|NONE|NIL)"),
        (Keyword(T::Now), r"(?i)^NOW"),
        (
            Token(T::String),
            r#"^(?:"(?:[^"\\]|\\["'\\/bfnrt]|\\u[0-9a-fA-F]{4})*"|'(?:[^'\\]|\\["'\\/bfnrt]|\\u[0-9a-fA-F]{4})*')"#,
        ),
        (Token(T::Key), r"^`(?:[^`\\]|\\[`\\/bfnrt]|\\u[0-9a-fA-F]{4})*`"),
        (Token(T::LParen), r"^\("),
        (Token(T::RParen), r"^\)"),
        (Token(T::LBracket), r"^\["),
        (Token(T::RBracket), r"^\]"),
        (Token(T::NotEqual), r"^(?:!=|<>)"),
        (Token(T::Equal), r"^=="),
        (Token(T::Lte), r"^<="),
        (Token(T::Gte), r"^>="),
        (Token(T::Lt), r"^<"),
        (Token(T::Gt), r"^>"),
        (Keyword(T::Like), r"(?i)^LIKE"),
        (Keyword(T::Match), r"(?i)^MATCH"),
        (Keyword(T::Contains), r"(?i)^CONTAINS?"),
        (Keyword(T::In), r"(?i)^IN"),
        (Keyword(T::Or), r"(?i)^OR"),
        (Keyword(T::And), r"(?i)^AND"),
        (Keyword(T::Not), r"(?i)^NOT"),
        (Token(T::Comma), r"^,"),
        // Greedy: closes at the last slash not preceded by a backslash
        (Token(T::Regexp), r"^/(?:.*[^\\\n])?/"),
        (BareKey, r"^[A-Za-z_][A-Za-z0-9_.\-]*"),
    ];

    table
        .iter()
        .map(|(kind, pattern)| Rule {
            kind: *kind,
            pattern: Regex::new(pattern).expect("lexer rule patterns are valid"),
        })
        .collect()
});

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

/// Turns query text into tokens, one at a time.
///
/// The lexer is finite and not restartable: once it has produced
/// [`TokenKind::Eof`] or an error, iteration ends.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    dialect: Dialect,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_dialect(input, Dialect::default())
    }

    pub fn with_dialect(input: &'a str, dialect: Dialect) -> Self {
        Lexer {
            input,
            position: 0,
            dialect,
            finished: false,
        }
    }

    /// Returns the next token, skipping whitespace.
    ///
    /// Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        'scan: loop {
            let rest = &self.input[self.position..];
            if rest.is_empty() {
                return Ok(Token::new(TokenKind::Eof, "", self.position));
            }

            for rule in RULES.iter() {
                let Some(found) = rule.pattern.find(rest) else {
                    continue;
                };
                let lexeme = &rest[..found.end()];
                let offset = self.position;

                let kind = match rule.kind {
                    RuleKind::Whitespace => {
                        self.position += lexeme.len();
                        continue 'scan;
                    }
                    RuleKind::Token(kind) => kind,
                    RuleKind::Keyword(kind) => {
                        if rest[lexeme.len()..]
                            .chars()
                            .next()
                            .is_some_and(is_identifier_char)
                        {
                            continue;
                        }
                        kind
                    }
                    RuleKind::BareKey => {
                        if self.dialect == Dialect::Strict {
                            continue;
                        }
                        TokenKind::Key
                    }
                };

                self.position += lexeme.len();
                return Ok(Token::new(kind, lexeme, offset));
            }

            let found = rest.chars().next().unwrap_or_default();
            return Err(LexError {
                offset: self.position,
                found,
            });
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(result, Ok(Token { kind: TokenKind::Eof, .. }) | Err(_)) {
            self.finished = true;
        }
        Some(result)
    }
}
