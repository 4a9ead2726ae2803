//! rf-algebra: relational algebra for raflow
//!
//! This crate provides the immutable scalar and relational-algebra
//! expression trees, the textual RA grammar (parser and renderer), the
//! rule-based optimizer passes, and the chain folder that fuses row-wise
//! operators ahead of task compilation.

pub mod attrs;
pub mod error;
pub mod expr;
pub mod fold;
pub mod parse;
pub mod pass;
pub mod ra;

pub use error::{AlgebraError, AlgebraResult};
pub use expr::{AttrRef, BinOp, Literal, LiteralKind, ScalarExpr};
pub use fold::fold_chains;
pub use parse::{parse_condition, parse_statement};
pub use pass::{optimize, PassManager, RewritePass};
pub use ra::{ChainStep, RaExpr, RenameAttrs, RenameSpec};
