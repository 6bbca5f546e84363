//! Field path resolution with fan-out across sequences.
//!
//! A path such as `users.address.city` is split on the key separator and
//! walked one segment at a time. Whenever a segment lands on a sequence,
//! every map (or entity) element of it continues the walk, so a single path
//! can resolve to many values. Comparisons then hold if they hold for any
//! of them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    evaluator::EvalError,
    value::{Shape, Value},
};

/// How field paths are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Split paths on `key_separator`. When false the whole path is one key.
    pub use_nested_keys: bool,
    pub key_separator: String,
    /// Fail with `KeyNotFound` instead of returning no values.
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            use_nested_keys: true,
            key_separator: ".".to_string(),
            strict: false,
        }
    }
}

/// Resolves `path` against `record`, in document order.
///
/// Missing keys and non-container values end their branch silently. An
/// empty result is an error only under `strict`.
///
/// # Examples
///
/// ```
/// use sift_lang::{Value, resolver::{resolve, ResolveOptions}};
/// use serde_json::json;
///
/// let record = Value::from(json!({"users": [{"age": 10}, {"age": 30}]}));
/// let ages = resolve(&record, "users.age", &ResolveOptions::default()).unwrap();
/// assert_eq!(ages, vec![Value::Integer(10), Value::Integer(30)]);
/// ```
pub fn resolve(record: &Value, path: &str, options: &ResolveOptions) -> Result<Vec<Value>, EvalError> {
    Ok(resolve_borrowed(record, path, options)?
        .into_iter()
        .map(Cow::into_owned)
        .collect())
}

/// Same as [`resolve`], borrowing from the record wherever the record
/// itself holds the value. Entity attributes come back owned.
pub(crate) fn resolve_borrowed<'r>(
    record: &'r Value,
    path: &str,
    options: &ResolveOptions,
) -> Result<Vec<Cow<'r, Value>>, EvalError> {
    let segments: Vec<&str> = if options.use_nested_keys && !options.key_separator.is_empty() {
        path.split(options.key_separator.as_str()).collect()
    } else {
        vec![path]
    };

    let mut result = Vec::new();
    // Worklist of (current value, index of the next segment). Children are
    // pushed in reverse so that pops follow document order.
    let mut pending: Vec<(Cow<'r, Value>, usize)> = vec![(Cow::Borrowed(record), 0)];

    while let Some((current, index)) = pending.pop() {
        let segment = segments[index];
        let children = match current {
            Cow::Borrowed(value) => step(value, segment),
            Cow::Owned(value) => step(&value, segment)
                .into_iter()
                .map(|child| Cow::Owned(child.into_owned()))
                .collect(),
        };

        if index + 1 == segments.len() {
            result.extend(children);
            continue;
        }

        for child in children.into_iter().rev() {
            match child.shape() {
                Shape::Map | Shape::Sequence => pending.push((child, index + 1)),
                Shape::Scalar => {}
            }
        }
    }

    if result.is_empty() && options.strict {
        tracing::trace!(path, "strict resolution found no values");
        return Err(EvalError::KeyNotFound {
            key: path.to_string(),
        });
    }
    Ok(result)
}

/// One segment of lookup: a map yields its entry, a sequence yields the
/// entry of each map element, anything else yields nothing.
fn step<'v>(current: &'v Value, segment: &str) -> Vec<Cow<'v, Value>> {
    match current.shape() {
        Shape::Map => lookup(current, segment).into_iter().collect(),
        Shape::Sequence => match current {
            Value::Array(items) => items
                .iter()
                .filter(|item| item.shape() == Shape::Map)
                .filter_map(|item| lookup(item, segment))
                .collect(),
            _ => Vec::new(),
        },
        Shape::Scalar => Vec::new(),
    }
}

fn lookup<'v>(map: &'v Value, key: &str) -> Option<Cow<'v, Value>> {
    match map {
        Value::Object(entries) => entries.get(key).map(Cow::Borrowed),
        other => other.field(key).map(Cow::Owned),
    }
}
