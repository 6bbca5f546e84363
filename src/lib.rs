//! Sift: a compact predicate language for filtering nested records.
//!
//! ```
//! use sift_lang::{Value, matches};
//! use serde_json::json;
//!
//! let record = Value::from(json!({"users": [{"age": 10}, {"age": 30}]}));
//! assert!(matches(&record, "users.age > 20").unwrap());
//! assert!(!matches(&record, "users.age > 100").unwrap());
//! ```
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod patterns;
pub mod query;
pub mod resolver;
pub mod validator;
pub mod value;

use std::borrow::Borrow;

pub use ast::{BinOp, Expr, Token, TokenKind, Visitor};
pub use compiler::{FilterCompiler, FilterResult};
pub use error::{Error, ErrorKind};
pub use evaluator::{EvalError, MatchEvaluator};
pub use lexer::{Dialect, LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use query::{CompileOptions, CompiledQuery, Filter};
pub use validator::{ValidationError, Validator};
pub use value::{Entity, Shape, Value};

/// Parses query text. A query without tokens parses to `None`.
pub fn parse(text: &str) -> Result<Option<Expr>, Error> {
    parse_with_dialect(text, Dialect::default())
}

pub fn parse_with_dialect(text: &str, dialect: Dialect) -> Result<Option<Expr>, Error> {
    Ok(Parser::new(Lexer::with_dialect(text, dialect))?.parse()?)
}

/// Parses, validates and prepares a query for repeated use.
pub fn compile(text: &str, options: CompileOptions) -> Result<CompiledQuery, Error> {
    CompiledQuery::new(text, options)
}

/// Tests one record against a query with default options.
pub fn matches(record: &Value, text: &str) -> Result<bool, Error> {
    CompiledQuery::new(text, CompileOptions::default())?.matches(record)
}

/// Lazily yields the records that match `text`.
///
/// ```
/// use sift_lang::{CompileOptions, Value, filter};
/// use serde_json::json;
///
/// let records: Vec<Value> = vec![
///     json!({"name": "alice", "age": 31}).into(),
///     json!({"name": "bob", "age": 17}).into(),
/// ];
/// let adults: Vec<Value> = filter(records, "age >= 18", CompileOptions::default())
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(adults.len(), 1);
/// ```
pub fn filter<I>(
    records: I,
    text: &str,
    options: CompileOptions,
) -> Result<Filter<CompiledQuery, I::IntoIter>, Error>
where
    I: IntoIterator,
    I::Item: Borrow<Value>,
{
    Ok(CompiledQuery::new(text, options)?.into_filter(records))
}

/// Translates a query into a MongoDB-style filter document.
///
/// ```
/// use sift_lang::to_external_filter;
/// use serde_json::json;
///
/// let filter = to_external_filter("age > 18 AND NOT banned", true).unwrap();
/// assert_eq!(
///     serde_json::Value::Object(filter),
///     json!({"$and": [{"age": {"$gt": 18.0}}, {"banned": {"$exists": false}}]})
/// );
/// ```
pub fn to_external_filter(text: &str, case_sensitive: bool) -> Result<FilterResult, Error> {
    let expr = parse(text)?;
    let filter = FilterCompiler::new(case_sensitive).compile(expr.as_ref())?;
    tracing::debug!(query = text, "translated query");
    Ok(filter)
}

/// True when `text` parses and passes validation.
pub fn is_valid(text: &str) -> bool {
    match parse(text) {
        Ok(Some(expr)) => validator::validate(&expr).is_ok(),
        Ok(None) => true,
        Err(_) => false,
    }
}
