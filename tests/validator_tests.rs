// tests/validator_tests.rs

use sift_lang::validator::{ValidationError, validate};
use sift_lang::{is_valid, parse};

fn validate_query(query: &str) -> Result<(), ValidationError> {
    let expr = parse(query).unwrap().unwrap();
    validate(&expr)
}

// ============================================================================
// Bare Literals
// ============================================================================

#[test]
fn test_bare_literals_are_rejected() {
    for query in ["12", "\"hello\"", "NONE", "True", "NOW", r"/\d+/", "[1, 2]"] {
        assert_eq!(
            validate_query(query),
            Err(ValidationError::BareLiteral),
            "Failed for query: {}",
            query
        );
    }
}

#[test]
fn test_bare_field_is_valid() {
    assert_eq!(validate_query("hello"), Ok(()));
    assert_eq!(validate_query("(hello)"), Ok(()));
}

// ============================================================================
// Logical Operands
// ============================================================================

#[test]
fn test_and_operands() {
    let literal_operand = Err(ValidationError::LiteralOperand { operator: "AND" });
    assert_eq!(validate_query("12 AND 45"), literal_operand);
    assert_eq!(validate_query("hello AND 45"), literal_operand);
    assert_eq!(validate_query("hello == 3 AND 45"), literal_operand);
    assert_eq!(validate_query("hello == 3 AND world > 3"), Ok(()));
}

#[test]
fn test_or_operands() {
    let literal_operand = Err(ValidationError::LiteralOperand { operator: "OR" });
    assert_eq!(validate_query("12 OR 45"), literal_operand);
    assert_eq!(validate_query("hello OR 45"), literal_operand);
    assert_eq!(validate_query("hello == 3 OR 45"), literal_operand);
    assert_eq!(validate_query("hello == 3 OR world > 3"), Ok(()));
}

#[test]
fn test_not_operand() {
    let literal_operand = Err(ValidationError::LiteralOperand { operator: "NOT" });
    assert_eq!(validate_query("NOT 3"), literal_operand);
    assert_eq!(validate_query("NOT False"), literal_operand);
    assert_eq!(validate_query("NOT hello"), Ok(()));
    assert_eq!(validate_query("NOT (a == 1 OR b)"), Ok(()));
}

#[test]
fn test_nested_errors_are_found() {
    assert_eq!(
        validate_query("a AND (b OR NOT 1)"),
        Err(ValidationError::LiteralOperand { operator: "NOT" })
    );
    assert_eq!(
        validate_query("a OR (b AND 1 == 2)"),
        Err(ValidationError::NoFieldOperand { operator: "==" })
    );
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_comparison_needs_a_field() {
    assert_eq!(
        validate_query("12 == 45"),
        Err(ValidationError::NoFieldOperand { operator: "==" })
    );
    assert_eq!(
        validate_query("'a' IN 'abc'"),
        Err(ValidationError::NoFieldOperand { operator: "IN" })
    );
    assert_eq!(validate_query("hello == 3"), Ok(()));
    assert_eq!(validate_query("3 == hello"), Ok(()));
    assert_eq!(validate_query("x < y"), Ok(()));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ValidationError::LiteralOperand { operator: "AND" }.to_string(),
        "AND expects conditions, found a literal operand"
    );
}

// ============================================================================
// is_valid
// ============================================================================

#[test]
fn test_is_valid() {
    assert!(is_valid("age > 18 AND name LIKE 'b*'"));
    assert!(is_valid(""));
    assert!(!is_valid("12"));
    assert!(!is_valid("age >"));
    assert!(!is_valid("a & b"));
}
