//! Reading records from JSON text and writing them back

use serde_json::Deserializer;

use super::CliError;
use crate::Value;

/// Reads records from JSON text.
///
/// Accepts a single document or a stream of whitespace separated documents
/// (JSON lines included). A top-level array contributes each of its
/// elements, any other top-level value is one record.
pub fn json_to_records(text: &str) -> Result<Vec<Value>, CliError> {
    let mut records = Vec::new();
    for document in Deserializer::from_str(text).into_iter::<serde_json::Value>() {
        match document? {
            serde_json::Value::Array(items) => records.extend(items.into_iter().map(Value::from)),
            other => records.push(Value::from(other)),
        }
    }
    if records.is_empty() && text.trim().is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(records)
}

/// Renders records as one JSON array.
pub fn records_to_json(records: &[Value]) -> serde_json::Value {
    serde_json::Value::Array(records.iter().map(Value::to_json).collect())
}

/// Serializes `value`, pretty-printed on request.
pub fn render(value: &serde_json::Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    Ok(text)
}
