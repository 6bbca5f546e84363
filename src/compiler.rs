//! Translation of queries into MongoDB-style filter documents.
//!
//! The target grammar is keyed by field and has no generic negation, so
//! the translation is stricter than evaluation: comparisons must have the
//! field on the left, and `NOT` is pushed down by rewriting.
//!
//! ```text
//! NOT (a AND b)       ->  {"$or": [NOT a, NOT b]}
//! NOT (a OR b)        ->  {"$nor": [a, b]}
//! NOT field           ->  {"field": {"$exists": false}}
//! NOT field op value  ->  {"field": {"$not": {op: value}}}
//! ```

use serde_json::{Map, Value as JsonValue, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    ast::{BinOp, Expr, Visitor, literals},
    evaluator::EvalError,
    patterns::glob_to_regex,
};

/// A filter document, e.g. `{"age": {"$gt": 18.0}}`.
pub type FilterResult = Map<String, JsonValue>;

/// Compiles a tree into a [`FilterResult`].
pub struct FilterCompiler {
    case_sensitive: bool,
    now: OffsetDateTime,
}

impl FilterCompiler {
    pub fn new(case_sensitive: bool) -> Self {
        FilterCompiler {
            case_sensitive,
            now: OffsetDateTime::now_utc(),
        }
    }

    /// Compiles a whole query. An empty query compiles to `{}`.
    pub fn compile(&mut self, expr: Option<&Expr>) -> Result<FilterResult, EvalError> {
        match expr {
            None => Ok(Map::new()),
            Some(expr) => self.condition(expr),
        }
    }

    /// A node in condition position. Bare fields become existence tests.
    fn condition(&mut self, expr: &Expr) -> Result<FilterResult, EvalError> {
        match expr {
            Expr::Field(path) => Ok(exists(path, true)),
            Expr::Not(_) | Expr::BinaryOp { .. } => match expr.accept(self)? {
                JsonValue::Object(filter) => Ok(filter),
                other => Err(EvalError::Evaluation(format!(
                    "expected a filter document, got {}",
                    other
                ))),
            },
            _ => Err(EvalError::Evaluation(
                "expected a condition or a field reference, found a literal".to_string(),
            )),
        }
    }

    fn negate(&mut self, operand: &Expr) -> Result<FilterResult, EvalError> {
        match operand {
            // NOT NOT x is x, not a nested $not
            Expr::Not(inner) => self.condition(inner),
            Expr::Field(path) => Ok(exists(path, false)),
            Expr::BinaryOp {
                op: BinOp::And,
                left,
                right,
            } => Ok(combine(
                "$or",
                self.negate(left)?,
                self.negate(right)?,
            )),
            Expr::BinaryOp {
                op: BinOp::Or,
                left,
                right,
            } => Ok(combine(
                "$nor",
                self.condition(left)?,
                self.condition(right)?,
            )),
            Expr::BinaryOp { .. } => {
                let mut negated = Map::new();
                for (key, value) in self.condition(operand)? {
                    let inner = match value {
                        JsonValue::Object(mut ops) if ops.contains_key("$regex") => {
                            ops.remove("$regex").unwrap_or(JsonValue::Null)
                        }
                        other => other,
                    };
                    negated.insert(key, json!({ "$not": inner }));
                }
                Ok(negated)
            }
            _ => Err(EvalError::Evaluation(
                "NOT expects a condition or a field reference, found a literal".to_string(),
            )),
        }
    }

    fn regex(&self, pattern: String) -> JsonValue {
        let options = if self.case_sensitive { "" } else { "i" };
        json!({ "$regularExpression": { "pattern": pattern, "options": options } })
    }
}

fn exists(path: &str, present: bool) -> FilterResult {
    let mut filter = Map::new();
    filter.insert(path.to_string(), json!({ "$exists": present }));
    filter
}

fn combine(operator: &str, left: FilterResult, right: FilterResult) -> FilterResult {
    let mut filter = Map::new();
    filter.insert(
        operator.to_string(),
        JsonValue::Array(vec![JsonValue::Object(left), JsonValue::Object(right)]),
    );
    filter
}

fn operator_key(op: BinOp) -> &'static str {
    match op {
        BinOp::Equal | BinOp::Contains => "$eq",
        BinOp::NotEqual => "$ne",
        BinOp::LessThan => "$lt",
        BinOp::LessEqual => "$lte",
        BinOp::GreaterThan => "$gt",
        BinOp::GreaterEqual => "$gte",
        BinOp::In => "$in",
        BinOp::Like | BinOp::Match => "$regex",
        BinOp::And => "$and",
        BinOp::Or => "$or",
    }
}

impl Visitor for FilterCompiler {
    type Output = Result<JsonValue, EvalError>;

    fn visit_number(&mut self, value: f64) -> Self::Output {
        serde_json::Number::from_f64(value)
            .map(JsonValue::Number)
            .ok_or_else(|| EvalError::Evaluation(format!("cannot translate number {}", value)))
    }

    fn visit_boolean(&mut self, value: bool) -> Self::Output {
        Ok(JsonValue::Bool(value))
    }

    fn visit_null(&mut self) -> Self::Output {
        Ok(JsonValue::Null)
    }

    fn visit_now(&mut self) -> Self::Output {
        let stamp = self
            .now
            .format(&Rfc3339)
            .map_err(|e| EvalError::Evaluation(format!("cannot format NOW: {}", e)))?;
        Ok(json!({ "$date": stamp }))
    }

    fn visit_string(&mut self, raw: &str) -> Self::Output {
        let text = literals::unquote(raw);
        if self.case_sensitive {
            Ok(JsonValue::String(text))
        } else {
            Ok(JsonValue::String(text.to_lowercase()))
        }
    }

    fn visit_regexp(&mut self, raw: &str) -> Self::Output {
        Ok(self.regex(literals::regexp_source(raw)))
    }

    fn visit_array(&mut self, items: &[Expr]) -> Self::Output {
        items
            .iter()
            .map(|item| item.accept(self))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array)
    }

    fn visit_field(&mut self, path: &str) -> Self::Output {
        Ok(JsonValue::String(path.to_string()))
    }

    fn visit_not(&mut self, operand: &Expr) -> Self::Output {
        self.negate(operand).map(JsonValue::Object)
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Self::Output {
        if op.is_logical() {
            let left = self.condition(left)?;
            let right = self.condition(right)?;
            return Ok(JsonValue::Object(combine(operator_key(op), left, right)));
        }

        let Expr::Field(path) = left else {
            return Err(EvalError::Evaluation(format!(
                "the left operand of {} must be a field reference",
                op
            )));
        };

        let operand = match (op, right.accept(self)?) {
            (BinOp::Like, JsonValue::String(glob)) => self.regex(glob_to_regex(&glob)),
            (BinOp::Like, _) => {
                return Err(EvalError::Evaluation(
                    "LIKE needs a string pattern on its right".to_string(),
                ));
            }
            (_, operand) => operand,
        };

        let mut filter = Map::new();
        filter.insert(path.clone(), json!({ operator_key(op): operand }));
        Ok(JsonValue::Object(filter))
    }
}
