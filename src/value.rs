use std::{cmp::Ordering, collections::HashMap, fmt, sync::Arc};

use rust_decimal::{Decimal, prelude::FromPrimitive};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// An attribute-bearing object that records can hold.
///
/// Implement this for domain types that should be queryable by attribute
/// name without first being converted into an [`Value::Object`].
///
/// # Examples
///
/// ```
/// use sift_lang::{Entity, Value};
///
/// #[derive(Debug)]
/// struct User {
///     name: String,
/// }
///
/// impl Entity for User {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::String(self.name.clone())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Entity: fmt::Debug + Send + Sync {
    /// Value of the named attribute, `None` if the entity has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Attribute names, used when the entity is rendered as JSON.
    fn attribute_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A record value.
///
/// Records are read-only to the engine: evaluation borrows them and never
/// mutates or retains them.
///
/// # Examples
///
/// ```
/// use sift_lang::Value;
/// use std::collections::HashMap;
///
/// // Scalar values
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(3.14);
/// let string = Value::String("hello".to_string());
///
/// // Collections
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Point in time, what `NOW` evaluates to
    Timestamp(OffsetDateTime),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed map
    Object(HashMap<String, Value>),

    /// Attribute-bearing object
    Entity(Arc<dyn Entity>),
}

/// Capability of a value during field resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Supports lookup by name (`Object` and `Entity`)
    Map,
    /// Supports iteration (`Array`)
    Sequence,
    /// Anything else
    Scalar,
}

impl Value {
    /// Converts any serializable value. Struct fields become map keys.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Object(_) | Value::Entity(_) => Shape::Map,
            Value::Array(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }

    /// Looks up a key on a map or an attribute on an entity.
    pub fn field(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(key).cloned(),
            Value::Entity(entity) => entity.attribute(key),
            _ => None,
        }
    }

    /// Check if the value is truthy (for conditions)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Float(n) => *n != 0.0,
            Integer(n) => *n != 0,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
            Timestamp(_) | Entity(_) => true,
        }
    }

    /// Copy with every string lower-cased, including strings nested in arrays.
    pub fn to_lowercase(&self) -> Value {
        match self {
            Value::String(s) => Value::String(s.to_lowercase()),
            Value::Array(items) => Value::Array(items.iter().map(Value::to_lowercase).collect()),
            other => other.clone(),
        }
    }

    /// Equality with numeric coercion between integers and floats.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.loose_eq(w)))
            }
            (Value::Entity(a), Value::Entity(b)) => Arc::ptr_eq(a, b),
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    /// Ordering between comparable values, `None` when the types do not order.
    ///
    /// Numbers order numerically, strings lexicographically, timestamps
    /// chronologically (RFC 3339 strings are accepted against timestamps),
    /// arrays element by element.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::String(b)) => {
                parse_timestamp(b).map(|b| a.cmp(&b))
            }
            (Value::String(a), Value::Timestamp(b)) => {
                parse_timestamp(a).map(|a| a.cmp(b))
            }
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Membership: an element of an array, a substring of a string, or a
    /// key of a map.
    pub fn contains(&self, item: &Value) -> bool {
        match (self, item) {
            (Value::Array(items), item) => items.iter().any(|v| v.loose_eq(item)),
            (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
            (Value::Object(map), Value::String(key)) => map.contains_key(key),
            (Value::Entity(entity), Value::String(key)) => entity.attribute(key).is_some(),
            _ => false,
        }
    }
}

/// Integer against float, exactly when both fit a decimal.
fn compare_mixed(a: i64, b: f64) -> Option<Ordering> {
    if let Some(ad) = Decimal::from_i64(a)
        && let Some(bd) = Decimal::from_f64(b)
    {
        return Some(ad.cmp(&bd));
    }
    (a as f64).partial_cmp(&b)
}

fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, &Rfc3339).ok()
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Entity(a), Value::Entity(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Value {
    /// Renders the value as JSON. Timestamps become RFC 3339 strings and
    /// entities become objects of their listed attributes.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(t) => t
                .format(&Rfc3339)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Entity(entity) => serde_json::Value::Object(
                entity
                    .attribute_names()
                    .into_iter()
                    .filter_map(|name| entity.attribute(&name).map(|v| (name, v.to_json())))
                    .collect(),
            ),
        }
    }
}
