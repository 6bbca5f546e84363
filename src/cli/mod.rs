//! CLI support for sift-lang
//!
//! Provides programmatic access to the `sift` commands so other tools can
//! embed them.

mod check;
mod convert;
mod filter;
mod translate;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{json_to_records, records_to_json, render};
pub use filter::{FilterOptions, execute_filter};
pub use translate::{TranslateOptions, execute_translate};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Query failed to parse, validate or evaluate
    #[error(transparent)]
    Query(#[from] crate::Error),

    /// JSON parsing error
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("no input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
