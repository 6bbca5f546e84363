use thiserror::Error;

use crate::ast::{BinOp, Expr, Visitor};

/// A well-formed query that has no meaning as a filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The whole query is a single literal, e.g. `42`
    #[error("a literal cannot stand alone as a query")]
    BareLiteral,

    /// `AND`, `OR` or `NOT` applied to a literal, e.g. `a AND 1`
    #[error("{operator} expects conditions, found a literal operand")]
    LiteralOperand { operator: &'static str },

    /// A comparison between two literals, e.g. `1 == 1`
    #[error("{operator} needs a field reference on at least one side")]
    NoFieldOperand { operator: &'static str },
}

/// Structural check of a tree. Reads no record data.
#[derive(Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn validate(&mut self, expr: &Expr) -> Result<(), ValidationError> {
        if expr.is_value_literal() {
            return Err(ValidationError::BareLiteral);
        }
        expr.accept(self)
    }

    fn condition(&mut self, operator: &'static str, operand: &Expr) -> Result<(), ValidationError> {
        if operand.is_value_literal() {
            return Err(ValidationError::LiteralOperand { operator });
        }
        operand.accept(self)
    }
}

/// Checks that `expr` can be used as a filter.
///
/// # Examples
///
/// ```
/// use sift_lang::{parse, validator::{validate, ValidationError}};
///
/// let ok = parse("age > 18 AND active").unwrap().unwrap();
/// assert!(validate(&ok).is_ok());
///
/// let bad = parse("age > 18 AND 1").unwrap().unwrap();
/// assert_eq!(
///     validate(&bad),
///     Err(ValidationError::LiteralOperand { operator: "AND" })
/// );
/// ```
pub fn validate(expr: &Expr) -> Result<(), ValidationError> {
    Validator.validate(expr)
}

impl Visitor for Validator {
    type Output = Result<(), ValidationError>;

    fn visit_number(&mut self, _: f64) -> Self::Output {
        Ok(())
    }

    fn visit_boolean(&mut self, _: bool) -> Self::Output {
        Ok(())
    }

    fn visit_null(&mut self) -> Self::Output {
        Ok(())
    }

    fn visit_now(&mut self) -> Self::Output {
        Ok(())
    }

    fn visit_string(&mut self, _: &str) -> Self::Output {
        Ok(())
    }

    fn visit_regexp(&mut self, _: &str) -> Self::Output {
        Ok(())
    }

    fn visit_array(&mut self, _: &[Expr]) -> Self::Output {
        Ok(())
    }

    fn visit_field(&mut self, _: &str) -> Self::Output {
        Ok(())
    }

    fn visit_not(&mut self, operand: &Expr) -> Self::Output {
        self.condition("NOT", operand)
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Self::Output {
        if op.is_logical() {
            self.condition(op.symbol(), left)?;
            return self.condition(op.symbol(), right);
        }
        if !left.is_field() && !right.is_field() {
            return Err(ValidationError::NoFieldOperand {
                operator: op.symbol(),
            });
        }
        Ok(())
    }
}
