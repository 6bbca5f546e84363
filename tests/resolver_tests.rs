// tests/resolver_tests.rs

use serde_json::json;
use sift_lang::evaluator::EvalError;
use sift_lang::resolver::{ResolveOptions, resolve};
use sift_lang::{Entity, Value};
use std::sync::Arc;

fn values(record: serde_json::Value, path: &str) -> Vec<serde_json::Value> {
    resolve(&Value::from(record), path, &ResolveOptions::default())
        .unwrap()
        .iter()
        .map(Value::to_json)
        .collect()
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn test_top_level_key() {
    assert_eq!(values(json!({"user": "cyberlis"}), "user"), vec![json!("cyberlis")]);
}

#[test]
fn test_nested_maps() {
    assert_eq!(
        values(json!({"user": {"firstname": "cyberlis"}}), "user.firstname"),
        vec![json!("cyberlis")]
    );
    assert_eq!(
        values(
            json!({"user": {"fullname": {"firstname": "cyberlis"}}}),
            "user.fullname.firstname"
        ),
        vec![json!("cyberlis")]
    );
}

#[test]
fn test_final_segment_returns_container_whole() {
    assert_eq!(
        values(json!({"roles": ["admin", "observer"]}), "roles"),
        vec![json!(["admin", "observer"])]
    );
}

// ============================================================================
// Fan-out Across Sequences
// ============================================================================

#[test]
fn test_fan_out_in_document_order() {
    assert_eq!(
        values(
            json!({"users": [{"firstname": "cyberlis"}, {"firstname": "rinagorsha"}]}),
            "users.firstname"
        ),
        vec![json!("cyberlis"), json!("rinagorsha")]
    );
}

#[test]
fn test_fan_out_through_nested_maps() {
    let record = json!({"users": [
        {"fullname": {"firstname": "cyberlis"}},
        {"odd_item": "odd_value"},
        {"fullname": {"firstname": "rinagorsha"}}
    ]});
    assert_eq!(
        values(record, "users.fullname.firstname"),
        vec![json!("cyberlis"), json!("rinagorsha")]
    );
}

#[test]
fn test_scalar_elements_are_skipped() {
    let record = json!({"users": [{"fullname": {"firstname": "cyberlis"}}, 23, "hello", "world"]});
    assert_eq!(values(record, "users.fullname.firstname"), vec![json!("cyberlis")]);
}

#[test]
fn test_nested_sequences() {
    let record = json!({"groups": [
        {"members": [{"age": 1}, {"age": 2}]},
        {"members": [{"age": 3}]}
    ]});
    assert_eq!(
        values(record, "groups.members.age"),
        vec![json!(1), json!(2), json!(3)]
    );
}

#[test]
fn test_record_itself_a_sequence() {
    assert_eq!(
        values(json!([{"a": 1}, {"b": 2}, {"a": 3}]), "a"),
        vec![json!(1), json!(3)]
    );
}

// ============================================================================
// Missing Keys
// ============================================================================

#[test]
fn test_missing_key_is_empty() {
    assert!(values(json!({"users": [{"fullname": {"lastname": "x"}}]}), "users.fullname.firstname").is_empty());
    assert!(values(json!({"a": 1}), "b").is_empty());
    assert!(values(json!({"a": 1}), "a.b").is_empty());
    assert!(values(json!("scalar"), "a").is_empty());
}

#[test]
fn test_strict_missing_key() {
    let options = ResolveOptions {
        strict: true,
        ..ResolveOptions::default()
    };
    let err = resolve(&Value::from(json!({"a": 1})), "a.b", &options).unwrap_err();
    assert!(matches!(err, EvalError::KeyNotFound { key } if key == "a.b"));

    let found = resolve(&Value::from(json!({"a": {"b": null}})), "a.b", &options).unwrap();
    assert_eq!(found, vec![Value::Null]);
}

// ============================================================================
// Separators
// ============================================================================

#[test]
fn test_flat_keys() {
    let options = ResolveOptions {
        use_nested_keys: false,
        ..ResolveOptions::default()
    };
    let record = Value::from(json!({"a.b": 1, "a": {"b": 2}}));
    assert_eq!(resolve(&record, "a.b", &options).unwrap(), vec![Value::Integer(1)]);
}

#[test]
fn test_custom_separator() {
    let options = ResolveOptions {
        key_separator: "/".to_string(),
        ..ResolveOptions::default()
    };
    let record = Value::from(json!({"a": {"b.c": 1}}));
    assert_eq!(resolve(&record, "a/b.c", &options).unwrap(), vec![Value::Integer(1)]);
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug)]
struct Account {
    owner: String,
    tags: Vec<String>,
}

impl Entity for Account {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "owner" => Some(Value::String(self.owner.clone())),
            "tags" => Some(Value::Array(
                self.tags.iter().cloned().map(Value::String).collect(),
            )),
            _ => None,
        }
    }
}

#[test]
fn test_entity_attributes() {
    let account = Value::Entity(Arc::new(Account {
        owner: "ann".to_string(),
        tags: vec!["x".to_string()],
    }));
    let record = Value::from(json!({"accounts": []}));
    let Value::Object(mut map) = record else {
        unreachable!()
    };
    map.insert("accounts".to_string(), Value::Array(vec![account.clone(), Value::Integer(3)]));
    let record = Value::Object(map);

    let options = ResolveOptions::default();
    assert_eq!(
        resolve(&record, "accounts.owner", &options).unwrap(),
        vec![Value::String("ann".to_string())]
    );
    assert!(resolve(&account, "missing", &options).unwrap().is_empty());
}
