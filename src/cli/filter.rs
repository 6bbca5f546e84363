//! Filter JSON records with a query

use super::{CliError, convert::json_to_records};
use crate::{CompileOptions, CompiledQuery, Value};

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// The query to run
    pub query: String,
    /// JSON input
    pub input: Option<String>,
    pub compile: CompileOptions,
}

/// Returns the records of the input that match the query, in input order.
pub fn execute_filter(options: &FilterOptions) -> Result<Vec<Value>, CliError> {
    let query = CompiledQuery::new(&options.query, options.compile.clone())?;
    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let records = json_to_records(input)?;
    tracing::debug!(records = records.len(), "filtering input");

    let matched = query.filter(records).collect::<Result<Vec<_>, _>>()?;
    Ok(matched)
}
