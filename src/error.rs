use thiserror::Error;

use crate::{evaluator::EvalError, lexer::LexError, parser::ParseError, validator::ValidationError};

/// Any failure of the public operations.
///
/// Use [`Error::kind`] to tell a malformed query (a programming error) from
/// a condition of the data such as a missing key.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Validation,
    Evaluation,
    KeyNotFound,
    InvalidPattern,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Eval(EvalError::Evaluation(_)) => ErrorKind::Evaluation,
            Error::Eval(EvalError::KeyNotFound { .. }) => ErrorKind::KeyNotFound,
            Error::Eval(EvalError::InvalidPattern { .. }) => ErrorKind::InvalidPattern,
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Syntax(ParseError::Lex(err))
    }
}
