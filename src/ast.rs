//! # Sift Query Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) of the
//! Sift query language, a compact predicate language for testing nested
//! records (maps, sequences and attribute-bearing entities).
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field references, operations)
//! - **[operators]** - Binary operators (comparison, membership, pattern, logical)
//! - **[visitor]** - The double-dispatch surface every pass is written against
//! - **[literals]** - Delimiter stripping, applied when a visitor evaluates a literal
//!
//! ## Quick Start
//!
//! ```text
//! status == "active" AND users.age > 20
//! ```
//!
//! This query holds for records whose `status` is `"active"` and where at
//! least one element of `users` has an `age` above 20.
//!
//! ## Core Concepts
//!
//! ### Precedence
//!
//! `OR` binds looser than `AND`, which binds looser than `NOT`. Both binary
//! chains are left associative. Parentheses group.
//!
//! ```text
//! a == 0 AND c == 1 OR z == 0      // (a == 0 AND c == 1) OR z == 0
//! a == 0 AND (c == 1 OR z == 0)
//! ```
//!
//! ### Field References
//!
//! A field reference is a path into the record. With nested keys enabled it
//! is split on the key separator and resolved one segment at a time,
//! fanning out across sequences:
//!
//! ```text
//! users.age > 20          // true if any user is older than 20
//! `first name` == "Bob"   // backticks for keys that are not identifiers
//! ```
//!
//! ### Literals
//!
//! Numbers, `TRUE`/`FALSE`, `NULL`/`NONE`/`NIL`, `NOW`, quoted strings,
//! `/regular expressions/` and arrays `[v, v, ...]`.
//!
//! ### Operators
//!
//! ```text
//! ==  !=  <>  <  <=  >  >=
//! role IN ["admin", "observer"]
//! roles CONTAINS "admin"
//! username LIKE "adm*"
//! username MATCH /^adm/
//! ```
pub mod expressions;
pub mod literals;
pub mod operators;
mod printer;
pub mod tokens;
pub mod visitor;

pub use expressions::Expr;
pub use operators::BinOp;
pub use tokens::{Token, TokenKind};
pub use visitor::Visitor;
