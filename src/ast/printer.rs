use std::fmt;

use crate::ast::{BinOp, Expr, Visitor};

const RESERVED_WORDS: &[&str] = &[
    "and", "or", "not", "in", "like", "match", "contains", "contain", "true", "false", "null",
    "none", "nil", "now",
];

/// Renders an expression back to canonical query text.
///
/// Logical operations are fully parenthesised so that re-parsing the output
/// gives back the same tree.
struct Printer<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl Visitor for Printer<'_, '_> {
    type Output = fmt::Result;

    fn visit_number(&mut self, value: f64) -> fmt::Result {
        write!(self.f, "{}", value)
    }

    fn visit_boolean(&mut self, value: bool) -> fmt::Result {
        self.f.write_str(if value { "TRUE" } else { "FALSE" })
    }

    fn visit_null(&mut self) -> fmt::Result {
        self.f.write_str("NULL")
    }

    fn visit_now(&mut self) -> fmt::Result {
        self.f.write_str("NOW")
    }

    fn visit_string(&mut self, raw: &str) -> fmt::Result {
        self.f.write_str(raw)
    }

    fn visit_regexp(&mut self, raw: &str) -> fmt::Result {
        self.f.write_str(raw)
    }

    fn visit_array(&mut self, items: &[Expr]) -> fmt::Result {
        self.f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.f.write_str(", ")?;
            }
            item.accept(self)?;
        }
        self.f.write_str("]")
    }

    fn visit_field(&mut self, path: &str) -> fmt::Result {
        if is_bare_key(path) {
            self.f.write_str(path)
        } else {
            self.f.write_str("`")?;
            for ch in path.chars() {
                if ch == '`' || ch == '\\' {
                    self.f.write_str("\\")?;
                }
                write!(self.f, "{}", ch)?;
            }
            self.f.write_str("`")
        }
    }

    fn visit_not(&mut self, operand: &Expr) -> fmt::Result {
        self.f.write_str("NOT (")?;
        operand.accept(self)?;
        self.f.write_str(")")
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> fmt::Result {
        if op.is_logical() {
            self.f.write_str("(")?;
        }
        left.accept(self)?;
        write!(self.f, " {} ", op)?;
        right.accept(self)?;
        if op.is_logical() {
            self.f.write_str(")")?;
        }
        Ok(())
    }
}

fn is_bare_key(path: &str) -> bool {
    let mut chars = path.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        && !RESERVED_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(path))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut Printer { f })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_comparison() {
        let expr = Expr::binary(
            BinOp::GreaterEqual,
            Expr::Field("age".into()),
            Expr::Number(18.0),
        );
        assert_eq!(expr.to_string(), "age >= 18");
    }

    #[test]
    fn test_print_quotes_awkward_keys() {
        assert_eq!(Expr::Field("first name".into()).to_string(), "`first name`");
        assert_eq!(Expr::Field("and".into()).to_string(), "`and`");
        assert_eq!(Expr::Field("a`b".into()).to_string(), "`a\\`b`");
    }

    #[test]
    fn test_print_logical_is_parenthesised() {
        let expr = Expr::not(Expr::binary(
            BinOp::Or,
            Expr::Field("a".into()),
            Expr::binary(
                BinOp::In,
                Expr::Field("b".into()),
                Expr::Array(vec![Expr::String("\"x\"".into()), Expr::Null]),
            ),
        ));
        assert_eq!(expr.to_string(), "NOT ((a OR b IN [\"x\", NULL]))");
    }
}
