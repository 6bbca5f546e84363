//! Translate queries into document filters

use super::CliError;
use crate::{FilterResult, to_external_filter};

/// Options for the translate command
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub query: String,
    pub case_insensitive: bool,
}

pub fn execute_translate(options: &TranslateOptions) -> Result<FilterResult, CliError> {
    Ok(to_external_filter(&options.query, !options.case_insensitive)?)
}
