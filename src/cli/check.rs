//! Syntax and validation checks

use super::CliError;
use crate::{CompileOptions, CompiledQuery};

/// Options for the check and parse commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// Only check syntax, skip validation
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// The query has no tokens
    Empty,
    /// The query is valid; holds its canonical form
    Valid(String),
}

/// Parse (and unless `syntax_only`, validate) a query.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let compile_options = CompileOptions {
        validate: !options.syntax_only,
        ..CompileOptions::default()
    };
    let query = CompiledQuery::new(&options.query, compile_options)?;

    Ok(match query.expr() {
        Some(expr) => CheckResult::Valid(expr.to_string()),
        None => CheckResult::Empty,
    })
}
