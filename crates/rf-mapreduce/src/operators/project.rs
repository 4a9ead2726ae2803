use super::{Emit, StageOperator};
use rf_algebra::AttrRef;
use rf_core::record::{decode_tuple, encode_tuple, label_for};
use rf_core::{resolve, Record, Tuple};

/// Restrict `tuple` to `attrs`, keeping the original key of each match.
/// Attributes that do not resolve are dropped.
pub fn project_tuple(tuple: &Tuple, attrs: &[AttrRef]) -> Tuple {
    let mut out = Tuple::new();
    for attr in attrs {
        let resolved = resolve(tuple, &attr.name());
        if let (Some(key), Some(value)) = (resolved.key(), resolved.value()) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

/// Projection with duplicate elimination.
///
/// The map keys on the serialized restricted tuple so the shuffle groups
/// duplicates; the reduce emits each distinct tuple once.
#[derive(Debug, Clone)]
pub struct ProjectOp {
    attrs: Vec<AttrRef>,
}

impl ProjectOp {
    pub fn new(attrs: Vec<AttrRef>) -> Self {
        Self { attrs }
    }
}

impl StageOperator for ProjectOp {
    fn name(&self) -> &'static str {
        "project"
    }

    fn map(&self, record: &Record) -> Vec<Emit> {
        let projected = project_tuple(&record.tuple, &self.attrs);
        vec![Emit::key_only(encode_tuple(&projected))]
    }

    fn has_reduce(&self) -> bool {
        true
    }

    fn reduce(&self, key: &str, _values: &[Record]) -> Vec<Record> {
        match decode_tuple(key) {
            Ok(tuple) => vec![Record::new(label_for(&tuple), tuple)],
            Err(e) => {
                log::warn!("Dropping projection group with undecodable key: {}", e);
                Vec::new()
            }
        }
    }
}
