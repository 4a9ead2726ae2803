//! Shared test utilities for rf-mapreduce and its dependents

use crate::runner::JobRunner;
use rf_algebra::{optimize, parse_statement};
use rf_core::{RelationName, Record, SchemaDirectory, Tuple};
use rf_store::{MemoryStore, StorageLocation};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Build a tuple from a JSON object literal
pub fn tuple(value: Value) -> Tuple {
    match value {
        Value::Object(map) => map,
        other => panic!("tuple fixture must be a JSON object, got {other}"),
    }
}

/// Seed `relation`'s base dataset with bare JSON-object lines
pub fn seed(store: &MemoryStore, relation: &str, rows: &[Value]) {
    let name = RelationName::try_new(relation).unwrap();
    let lines = rows.iter().map(Value::to_string).collect();
    store.insert(StorageLocation::Dataset(name), lines).unwrap();
}

/// Person{id,name} and Dept{id,pid} as a schema directory
pub fn person_dept_schema() -> SchemaDirectory {
    SchemaDirectory::new()
        .with_relation("Person", ["id", "name"])
        .with_relation("Dept", ["id", "pid"])
}

/// Memory store holding Person (1,Ana), (2,Bob) and Dept (10,1), (20,2)
pub fn person_dept_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    seed(
        &store,
        "Person",
        &[json!({"id": 1, "name": "Ana"}), json!({"id": 2, "name": "Bob"})],
    );
    seed(
        &store,
        "Dept",
        &[json!({"id": 10, "pid": 1}), json!({"id": 20, "pid": 2})],
    );
    Arc::new(store)
}

/// Parse, optionally optimize, and run an RA statement
pub async fn run_ra(
    store: Arc<MemoryStore>,
    dd: &SchemaDirectory,
    text: &str,
    optimized: bool,
) -> Vec<Record> {
    let mut tree = parse_statement(text).unwrap();
    if optimized {
        tree = optimize(tree, dd);
    }
    JobRunner::new(store).run(&tree, optimized).await.unwrap()
}

/// Result records as a set of `(label, payload)` lines
pub fn row_set(records: &[Record]) -> BTreeSet<String> {
    records.iter().map(Record::to_line).collect()
}

/// Result tuples as a set of payloads, ignoring labels
pub fn tuple_set(records: &[Record]) -> BTreeSet<String> {
    records.iter().map(Record::payload).collect()
}
