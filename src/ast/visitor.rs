use crate::ast::{BinOp, Expr};

/// One operation over the AST.
///
/// `Expr::accept` dispatches to the method matching the node kind; a method
/// recurses by calling `accept` on the children it cares about. New passes
/// (evaluators, printers, analyzers) implement this trait without touching
/// the node types.
pub trait Visitor {
    type Output;

    fn visit_number(&mut self, value: f64) -> Self::Output;
    fn visit_boolean(&mut self, value: bool) -> Self::Output;
    fn visit_null(&mut self) -> Self::Output;
    fn visit_now(&mut self) -> Self::Output;
    /// `raw` still carries its quotes.
    fn visit_string(&mut self, raw: &str) -> Self::Output;
    /// `raw` still carries its slashes.
    fn visit_regexp(&mut self, raw: &str) -> Self::Output;
    fn visit_array(&mut self, items: &[Expr]) -> Self::Output;
    fn visit_field(&mut self, path: &str) -> Self::Output;
    fn visit_not(&mut self, operand: &Expr) -> Self::Output;
    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Self::Output;
}

impl Expr {
    /// Double dispatch into `visitor`.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Number(n) => visitor.visit_number(*n),
            Expr::Boolean(b) => visitor.visit_boolean(*b),
            Expr::Null => visitor.visit_null(),
            Expr::Now => visitor.visit_now(),
            Expr::String(raw) => visitor.visit_string(raw),
            Expr::Regexp(raw) => visitor.visit_regexp(raw),
            Expr::Array(items) => visitor.visit_array(items),
            Expr::Field(path) => visitor.visit_field(path),
            Expr::Not(operand) => visitor.visit_not(operand),
            Expr::BinaryOp { op, left, right } => visitor.visit_binary(*op, left, right),
        }
    }
}
