use super::{Emit, StageOperator};
use rf_core::resolve::requalify;
use rf_core::Record;

/// Re-qualify every key of `record` under `alias` and relabel it
pub fn rename_record(record: &Record, alias: &str) -> Record {
    let tuple = record
        .tuple
        .iter()
        .map(|(k, v)| (requalify(k, alias), v.clone()))
        .collect();
    Record::new(alias, tuple)
}

/// Map-only rename. Without an alias records pass through unchanged.
#[derive(Debug, Clone)]
pub struct RenameOp {
    alias: Option<String>,
}

impl RenameOp {
    pub fn new(alias: Option<String>) -> Self {
        Self { alias }
    }
}

impl StageOperator for RenameOp {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn map(&self, record: &Record) -> Vec<Emit> {
        let out = match &self.alias {
            Some(alias) => rename_record(record, alias),
            None => record.clone(),
        };
        vec![Emit::record(out.relation.clone(), out)]
    }

    fn has_reduce(&self) -> bool {
        false
    }
}
