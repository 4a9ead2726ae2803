//! Map and reduce bodies for each physical operator
//!
//! Every task kind except `Load` is backed by a [`StageOperator`]. The
//! runner drives an operator the same way a distributed framework would:
//! `begin_map` once per map invocation, `map` for each non-placeholder
//! input record, then (for operators with a reduce phase) `reduce` once per
//! key group after the shuffle.

mod chained;
mod join;
mod project;
mod rename;
mod select;

pub use chained::{ChainedOp, TOUCH_KEY};
pub use join::{join_key, JoinOp};
pub use project::{project_tuple, ProjectOp};
pub use rename::{rename_record, RenameOp};
pub use select::SelectOp;

use crate::error::{ExecError, ExecResult};
use rf_algebra::RaExpr;
use rf_core::Record;

/// One key/value pair emitted by a map phase.
///
/// `value` is `None` for key-only emissions (projection keys, the chained
/// sentinel). The shuffle still creates a group for such keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Emit {
    pub key: String,
    pub value: Option<Record>,
}

impl Emit {
    /// Key with a record attached
    pub fn record(key: impl Into<String>, record: Record) -> Self {
        Self {
            key: key.into(),
            value: Some(record),
        }
    }

    /// Key with no value
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// Physical operator executed by one stage
pub trait StageOperator: Send + Sync {
    /// Operator name for logging
    fn name(&self) -> &'static str;

    /// Emissions produced once per map invocation, before any record
    fn begin_map(&self) -> Vec<Emit> {
        Vec::new()
    }

    /// Map one input record
    fn map(&self, record: &Record) -> Vec<Emit>;

    /// Whether this operator has a reduce phase. Map-only operators write
    /// the values of their emissions directly.
    fn has_reduce(&self) -> bool;

    /// Reduce one key group. `values` holds the non-empty emission values
    /// for `key` in arrival order.
    fn reduce(&self, _key: &str, values: &[Record]) -> Vec<Record> {
        values.to_vec()
    }
}

/// Build the operator for the root node of a task's tree
pub fn operator_for(node: &RaExpr) -> ExecResult<Box<dyn StageOperator>> {
    let op: Box<dyn StageOperator> = match node {
        RaExpr::Select { cond, .. } => Box::new(SelectOp::new(cond.clone())),
        RaExpr::Project { attrs, .. } => Box::new(ProjectOp::new(attrs.clone())),
        RaExpr::Rename { spec, .. } => Box::new(RenameOp::new(spec.alias.clone())),
        RaExpr::Chained { steps, .. } => Box::new(ChainedOp::new(steps.clone())),
        RaExpr::Join { left, cond, right } => Box::new(JoinOp::new(cond.clone(), left, right)),
        RaExpr::Cross { .. } | RaExpr::Relation(_) => {
            return Err(ExecError::UnsupportedOperator {
                kind: node.kind().to_string(),
            })
        }
    };
    Ok(op)
}
