use super::{Emit, StageOperator};
use crate::eval::holds;
use rf_algebra::ScalarExpr;
use rf_core::Record;

/// Map-only filter: keep records whose tuple satisfies the condition
#[derive(Debug, Clone)]
pub struct SelectOp {
    cond: ScalarExpr,
}

impl SelectOp {
    pub fn new(cond: ScalarExpr) -> Self {
        Self { cond }
    }
}

impl StageOperator for SelectOp {
    fn name(&self) -> &'static str {
        "select"
    }

    fn map(&self, record: &Record) -> Vec<Emit> {
        if holds(&self.cond, &record.tuple) {
            vec![Emit::record(record.relation.clone(), record.clone())]
        } else {
            Vec::new()
        }
    }

    fn has_reduce(&self) -> bool {
        false
    }
}
