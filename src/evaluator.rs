use std::borrow::Cow;

use regex::Regex;
use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    ast::{BinOp, Expr, Visitor, literals},
    patterns::{PatternCache, PatternKey},
    resolver::{ResolveOptions, resolve_borrowed},
    value::Value,
};

/// Errors raised while evaluating a query against one record.
///
/// None of these poison a compiled query: the next record is evaluated
/// from scratch.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The tree has a shape the evaluator cannot give a meaning to, such as
    /// a bare literal used as a condition. Validation rejects these up front.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Strict resolution found no value for the path
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    /// A regular expression or LIKE pattern that does not compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// What a node evaluates to.
pub enum Term<'r> {
    /// Values resolved from the record for a field reference
    Values(Vec<Cow<'r, Value>>),
    /// A literal operand
    Literal(Value),
    /// A compiled regular expression literal
    Pattern(Regex),
    /// Result of a condition
    Truth(bool),
}

impl<'r> Term<'r> {
    /// Candidate values for a comparison. A literal is a one-element set.
    fn into_values(self, op: BinOp) -> Result<Vec<Cow<'r, Value>>, EvalError> {
        match self {
            Term::Values(values) => Ok(values),
            Term::Literal(value) => Ok(vec![Cow::Owned(value)]),
            Term::Pattern(_) => Err(EvalError::Evaluation(format!(
                "a regular expression cannot be an operand of {}",
                op
            ))),
            Term::Truth(_) => Err(EvalError::Evaluation(format!(
                "a condition cannot be an operand of {}",
                op
            ))),
        }
    }

    /// Truth value of the term used as a condition.
    ///
    /// A field holds if any of its values is truthy. Literals have no
    /// truth value of their own.
    fn into_truth(self) -> Result<bool, EvalError> {
        match self {
            Term::Truth(b) => Ok(b),
            Term::Values(values) => Ok(values.iter().any(|v| v.is_truthy())),
            Term::Literal(_) | Term::Pattern(_) => Err(EvalError::Evaluation(
                "a literal cannot be used as a condition".to_string(),
            )),
        }
    }
}

/// Evaluates a tree against one record.
///
/// An evaluator is built per call and borrows everything it reads, so a
/// compiled query can be evaluated from many threads at once, each with its
/// own evaluator.
pub struct MatchEvaluator<'r> {
    record: &'r Value,
    resolve: &'r ResolveOptions,
    case_sensitive: bool,
    patterns: &'r PatternCache,
    /// `NOW`, fixed for the whole evaluation
    now: OffsetDateTime,
}

impl<'r> MatchEvaluator<'r> {
    pub fn new(
        record: &'r Value,
        resolve: &'r ResolveOptions,
        case_sensitive: bool,
        patterns: &'r PatternCache,
    ) -> Self {
        MatchEvaluator {
            record,
            resolve,
            case_sensitive,
            patterns,
            now: OffsetDateTime::now_utc(),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<bool, EvalError> {
        expr.accept(self)?.into_truth()
    }

    fn fold_case(&self, value: Value) -> Value {
        if self.case_sensitive {
            value
        } else {
            value.to_lowercase()
        }
    }

    fn pattern_match(&self, op: BinOp, left: Term<'r>, pattern: &Regex) -> Result<bool, EvalError> {
        Ok(left.into_values(op)?.iter().any(|value| match &**value {
            Value::String(text) => pattern.is_match(text),
            _ => false,
        }))
    }
}

/// Evaluates `expr` against `record` with default resolution and
/// case-sensitive comparisons.
///
/// Patterns are compiled on use; prefer [`crate::CompiledQuery`] when the
/// same query runs over many records.
///
/// # Examples
///
/// ```
/// use sift_lang::{Value, evaluator::evaluate, parse};
/// use serde_json::json;
///
/// let expr = parse("users.age > 20").unwrap().unwrap();
/// let record = Value::from(json!({"users": [{"age": 10}, {"age": 30}]}));
/// assert!(evaluate(&expr, &record).unwrap());
/// ```
pub fn evaluate(expr: &Expr, record: &Value) -> Result<bool, EvalError> {
    let resolve = ResolveOptions::default();
    let patterns = PatternCache::new(true);
    MatchEvaluator::new(record, &resolve, true, &patterns).evaluate(expr)
}

fn compare(op: BinOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering::*;

    match op {
        BinOp::Equal => left.loose_eq(right),
        BinOp::NotEqual => !left.loose_eq(right),
        BinOp::LessThan => left.compare(right) == Some(Less),
        BinOp::LessEqual => matches!(left.compare(right), Some(Less | Equal)),
        BinOp::GreaterThan => left.compare(right) == Some(Greater),
        BinOp::GreaterEqual => matches!(left.compare(right), Some(Greater | Equal)),
        BinOp::In => right.contains(left),
        BinOp::Contains => left.contains(right),
        BinOp::Like | BinOp::Match | BinOp::And | BinOp::Or => false,
    }
}

impl<'r> Visitor for MatchEvaluator<'r> {
    type Output = Result<Term<'r>, EvalError>;

    fn visit_number(&mut self, value: f64) -> Self::Output {
        Ok(Term::Literal(Value::Float(value)))
    }

    fn visit_boolean(&mut self, value: bool) -> Self::Output {
        Ok(Term::Literal(Value::Boolean(value)))
    }

    fn visit_null(&mut self) -> Self::Output {
        Ok(Term::Literal(Value::Null))
    }

    fn visit_now(&mut self) -> Self::Output {
        Ok(Term::Literal(Value::Timestamp(self.now)))
    }

    fn visit_string(&mut self, raw: &str) -> Self::Output {
        let text = Value::String(literals::unquote(raw));
        Ok(Term::Literal(self.fold_case(text)))
    }

    fn visit_regexp(&mut self, raw: &str) -> Self::Output {
        let key = PatternKey::Regexp(literals::regexp_source(raw));
        Ok(Term::Pattern(self.patterns.get(&key)?))
    }

    fn visit_array(&mut self, items: &[Expr]) -> Self::Output {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match item.accept(self)? {
                Term::Literal(value) => values.push(value),
                Term::Values(resolved) => values.extend(resolved.into_iter().map(Cow::into_owned)),
                Term::Truth(b) => values.push(Value::Boolean(b)),
                Term::Pattern(_) => {
                    return Err(EvalError::Evaluation(
                        "a regular expression cannot be an array element".to_string(),
                    ));
                }
            }
        }
        Ok(Term::Literal(Value::Array(values)))
    }

    fn visit_field(&mut self, path: &str) -> Self::Output {
        let values = resolve_borrowed(self.record, path, self.resolve)?;
        if self.case_sensitive {
            return Ok(Term::Values(values));
        }
        Ok(Term::Values(
            values
                .into_iter()
                .map(|v| Cow::Owned(v.to_lowercase()))
                .collect(),
        ))
    }

    fn visit_not(&mut self, operand: &Expr) -> Self::Output {
        Ok(Term::Truth(!operand.accept(self)?.into_truth()?))
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Self::Output {
        match op {
            BinOp::And => {
                if !left.accept(self)?.into_truth()? {
                    return Ok(Term::Truth(false));
                }
                Ok(Term::Truth(right.accept(self)?.into_truth()?))
            }
            BinOp::Or => {
                if left.accept(self)?.into_truth()? {
                    return Ok(Term::Truth(true));
                }
                Ok(Term::Truth(right.accept(self)?.into_truth()?))
            }
            BinOp::Match => {
                let lhs = left.accept(self)?;
                let Term::Pattern(pattern) = right.accept(self)? else {
                    return Err(EvalError::Evaluation(
                        "MATCH needs a regular expression on its right".to_string(),
                    ));
                };
                Ok(Term::Truth(self.pattern_match(op, lhs, &pattern)?))
            }
            BinOp::Like => {
                let lhs = left.accept(self)?;
                let Term::Literal(Value::String(glob)) = right.accept(self)? else {
                    return Err(EvalError::Evaluation(
                        "LIKE needs a string pattern on its right".to_string(),
                    ));
                };
                let pattern = self.patterns.get(&PatternKey::Glob(glob))?;
                Ok(Term::Truth(self.pattern_match(op, lhs, &pattern)?))
            }
            _ => {
                let lhs = left.accept(self)?.into_values(op)?;
                let rhs = right.accept(self)?.into_values(op)?;
                let holds = lhs
                    .iter()
                    .any(|l| rhs.iter().any(|r| compare(op, l, r)));
                Ok(Term::Truth(holds))
            }
        }
    }
}
