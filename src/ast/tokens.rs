use std::fmt;

/// Kind of a lexical token.
///
/// The set is closed: the lexer never produces anything outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Optionally signed decimal number with optional exponent
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.5
    /// 1e10
    /// ```
    Number,

    /// `TRUE` or `FALSE`, any case
    Boolean,

    /// `NULL`, `NONE` or `NIL`, any case
    Null,

    /// `NOW`, the evaluation-time UTC timestamp
    Now,

    /// Single or double quoted string, delimiters included in the lexeme
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// "café"
    /// ```
    String,

    /// Field reference, either backtick quoted or a bare identifier
    ///
    /// # Examples
    /// ```text
    /// age
    /// users.age
    /// `user name`
    /// ```
    Key,

    /// Slash delimited regular expression, closed by the last unescaped slash
    ///
    /// # Examples
    /// ```text
    /// /^adm.*$/
    /// /a\/b/
    /// ```
    Regexp,

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    // Comparison
    /// `==`
    Equal,
    /// `!=` or `<>`
    NotEqual,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,

    // Keyword operators
    /// `LIKE`
    Like,
    /// `MATCH`
    Match,
    /// `CONTAINS` (or `CONTAIN`)
    Contains,
    /// `IN`
    In,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Human readable name used in syntax errors.
    pub fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            Number => "NUMBER",
            Boolean => "BOOLEAN",
            Null => "NULL",
            Now => "NOW",
            String => "STRING",
            Key => "KEY",
            Regexp => "REGEXP",
            LParen => "'('",
            RParen => "')'",
            LBracket => "'['",
            RBracket => "']'",
            Comma => "','",
            Equal => "'=='",
            NotEqual => "'!='",
            Lt => "'<'",
            Lte => "'<='",
            Gt => "'>'",
            Gte => "'>='",
            Like => "LIKE",
            Match => "MATCH",
            Contains => "CONTAINS",
            In => "IN",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single token: its kind, the raw lexeme and where it starts.
///
/// Tokens borrow from the query text and only live for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// Byte offset of the first character in the query text
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, offset: usize) -> Self {
        Token {
            kind,
            lexeme,
            offset,
        }
    }
}
