use super::project::project_tuple;
use super::rename::rename_record;
use super::{Emit, StageOperator};
use crate::eval::holds;
use rf_algebra::ChainStep;
use rf_core::record::label_for;
use rf_core::Record;
use std::collections::HashSet;

/// Sentinel key every chained map invocation emits once.
///
/// It guarantees the reduce phase sees at least one group, so a chain whose
/// every record was filtered out still produces output (a single
/// placeholder) instead of an absent stage.
pub const TOUCH_KEY: &str = "__touch__";

/// A folded chain of select/project/rename steps run in one stage.
///
/// Steps are applied innermost first to each record in the map. The reduce
/// deduplicates per label, which gives the chain set semantics whenever it
/// contains a projection.
#[derive(Debug, Clone)]
pub struct ChainedOp {
    steps: Vec<ChainStep>,
}

impl ChainedOp {
    pub fn new(steps: Vec<ChainStep>) -> Self {
        Self { steps }
    }

    fn apply(&self, record: &Record) -> Option<Record> {
        let mut current = record.clone();
        for step in &self.steps {
            match step {
                ChainStep::Select(cond) => {
                    if !holds(cond, &current.tuple) {
                        return None;
                    }
                }
                ChainStep::Project(attrs) => {
                    let tuple = project_tuple(&current.tuple, attrs);
                    current = Record::new(label_for(&tuple), tuple);
                }
                ChainStep::Rename(spec) => {
                    if let Some(alias) = &spec.alias {
                        current = rename_record(&current, alias);
                    }
                }
            }
        }
        Some(current)
    }
}

impl StageOperator for ChainedOp {
    fn name(&self) -> &'static str {
        "chained"
    }

    fn begin_map(&self) -> Vec<Emit> {
        vec![Emit::key_only(TOUCH_KEY)]
    }

    fn map(&self, record: &Record) -> Vec<Emit> {
        self.apply(record)
            .map(|out| vec![Emit::record(out.relation.clone(), out)])
            .unwrap_or_default()
    }

    fn has_reduce(&self) -> bool {
        true
    }

    fn reduce(&self, key: &str, values: &[Record]) -> Vec<Record> {
        if values.is_empty() {
            // only the sentinel group carries no values
            return vec![Record::placeholder()];
        }
        let mut seen = HashSet::new();
        values
            .iter()
            .filter(|r| seen.insert(r.payload()))
            .map(|r| Record::new(key, r.tuple.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_algebra::{parse_statement, RaExpr};
    use serde_json::json;

    fn chain(text: &str) -> ChainedOp {
        match rf_algebra::fold_chains(parse_statement(text).unwrap()) {
            RaExpr::Chained { steps, .. } => ChainedOp::new(steps),
            other => panic!("expected a chain, got {other}"),
        }
    }

    fn person(id: i64, age: i64) -> Record {
        Record::new(
            "Person",
            json!({"Person.id": id, "Person.age": age}).as_object().cloned().unwrap(),
        )
    }

    #[test]
    fn test_steps_apply_innermost_first() {
        let op = chain("\\project_{P.id} \\rename_{P:*} \\select_{Person.age > 30} Person");
        let out = op.map(&person(1, 40));
        assert_eq!(out.len(), 1);
        let record = out[0].value.clone().unwrap();
        assert_eq!(record.relation, "P");
        assert_eq!(serde_json::Value::Object(record.tuple), json!({"P.id": 1}));
        assert!(op.map(&person(2, 20)).is_empty());
    }

    #[test]
    fn test_sentinel_group_yields_one_placeholder() {
        let op = chain("\\project_{Person.id} \\select_{Person.age > 99} Person");
        assert_eq!(op.begin_map(), vec![Emit::key_only(TOUCH_KEY)]);
        assert_eq!(op.reduce(TOUCH_KEY, &[]), vec![Record::placeholder()]);
    }

    #[test]
    fn test_reduce_deduplicates_per_label() {
        let op = chain("\\project_{Person.age} \\select_{Person.age > 0} Person");
        let a = Record::new("Person", json!({"Person.age": 40}).as_object().cloned().unwrap());
        let b = Record::new("Person", json!({"Person.age": 41}).as_object().cloned().unwrap());
        let out = op.reduce("Person", &[a.clone(), b.clone(), a.clone()]);
        assert_eq!(out, vec![a, b]);
    }
}
