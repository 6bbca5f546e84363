use crate::ast::BinOp;

/// Abstract Syntax Tree node representing a parsed query.
///
/// The tree is immutable once built and owns its children exclusively,
/// so a single parsed query can be shared across threads and evaluated
/// any number of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Numeric literal, always evaluated as a float
    ///
    /// # Example
    /// ```text
    /// 42
    /// -1.5e3
    /// ```
    Number(f64),

    /// Boolean literal
    Boolean(bool),

    /// Null literal (`NULL`, `NONE`, `NIL`)
    Null,

    /// Current UTC time, captured when the literal is evaluated
    Now,

    /// String literal.
    ///
    /// Holds the raw lexeme, quotes and escapes included. Visitors strip
    /// the delimiters when they evaluate the literal.
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// ```
    String(String),

    /// Regular expression literal.
    ///
    /// Holds the raw lexeme, slashes included.
    ///
    /// # Example
    /// ```text
    /// /^adm.*/
    /// ```
    Regexp(String),

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// ["admin", "observer", 12]
    /// ```
    Array(Vec<Expr>),

    /// Field reference: a separator-delimited path into the record
    ///
    /// # Examples
    /// ```text
    /// age
    /// users.age
    /// `first name`
    /// ```
    Field(String),

    // Operations
    /// Logical negation (`NOT`)
    Not(Box<Expr>),

    /// Comparison, membership, pattern or logical operation
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    /// True for a field reference.
    pub fn is_field(&self) -> bool {
        matches!(self, Expr::Field(_))
    }

    /// True for every literal kind except field references.
    pub fn is_value_literal(&self) -> bool {
        matches!(
            self,
            Expr::Number(_)
                | Expr::Boolean(_)
                | Expr::Null
                | Expr::Now
                | Expr::String(_)
                | Expr::Regexp(_)
                | Expr::Array(_)
        )
    }
}
