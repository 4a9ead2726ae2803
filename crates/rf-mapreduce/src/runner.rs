//! Local async job runner
//!
//! Plays the external scheduler and shuffle for a single process: each
//! task's dependencies complete before its map phase starts, the two
//! inputs of a join run concurrently, and the shuffle is an in-memory
//! group-by. Stages exchange data only through the [`StageStore`].

use crate::compile::{compile, TaskDescriptor, TaskKind};
use crate::error::ExecResult;
use crate::operators::{Emit, StageOperator};
use crate::plan::TaskDag;
use futures::future::BoxFuture;
use rf_algebra::RaExpr;
use rf_core::Record;
use rf_store::{StageStore, StorageLocation};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs compiled queries against a stage store
#[derive(Clone)]
pub struct JobRunner {
    store: Arc<dyn StageStore>,
}

impl JobRunner {
    /// Create a runner over `store`
    pub fn new(store: Arc<dyn StageStore>) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn StageStore> {
        &self.store
    }

    /// Compile and execute `tree`, returning the result records with
    /// placeholders stripped.
    ///
    /// The full task DAG is built first, so an unsupported operator fails
    /// the job before any stage is executed.
    pub async fn run(&self, tree: &RaExpr, optimize: bool) -> ExecResult<Vec<Record>> {
        let dag = TaskDag::build(tree, optimize)?;
        let root = compile(tree, 1, optimize)?;
        log::debug!(
            "Running {} task(s) on the {} store",
            dag.len(),
            self.store.store_type()
        );

        let location = self.run_task(root).await?;
        let records: Vec<Record> = self
            .read_records(&location)
            .await?
            .into_iter()
            .filter(|r| !r.is_placeholder())
            .collect();

        log::info!(
            "Job finished: {} stage(s), {} record(s) from {}",
            dag.len(),
            records.len(),
            location
        );
        Ok(records)
    }

    /// Execute one task after its dependencies and return where its output
    /// lives. Re-running a task rewrites the same location with the same
    /// contents.
    pub fn run_task(&self, task: TaskDescriptor) -> BoxFuture<'_, ExecResult<StorageLocation>> {
        Box::pin(async move {
            let mut deps = task.dependencies()?;
            let inputs = match (deps.pop(), deps.pop()) {
                (None, _) => Vec::new(),
                (Some(only), None) => vec![self.run_task(only).await?],
                (Some(right), Some(left)) => {
                    let (l, r) = tokio::try_join!(self.run_task(left), self.run_task(right))?;
                    vec![l, r]
                }
            };

            if task.kind == TaskKind::Load {
                return task.output_location();
            }
            self.execute(&task, &inputs).await
        })
    }

    async fn execute(
        &self,
        task: &TaskDescriptor,
        inputs: &[StorageLocation],
    ) -> ExecResult<StorageLocation> {
        let op = task.operator()?;

        let mut records = Vec::new();
        for input in inputs {
            records.extend(self.read_records(input).await?);
        }
        let records_in = records.len();

        let emits = map_phase(op.as_ref(), &records);
        let output = if op.has_reduce() {
            reduce_phase(op.as_ref(), emits)
        } else {
            emits.into_iter().filter_map(|e| e.value).collect()
        };

        let location = task.output_location()?;
        let lines: Vec<String> = output.iter().map(Record::to_line).collect();
        self.store.write_lines(&location, &lines).await?;

        log::debug!(
            "Stage {} ({}): {} record(s) in, {} out -> {}",
            task.stage,
            op.name(),
            records_in,
            output.len(),
            location
        );
        Ok(location)
    }

    /// Read a location, skipping lines that do not parse
    async fn read_records(&self, location: &StorageLocation) -> ExecResult<Vec<Record>> {
        let lines = self.store.read_lines(location).await?;
        let mut records = Vec::with_capacity(lines.len());
        for line in &lines {
            let parsed = match location {
                StorageLocation::Dataset(name) => Record::parse_dataset_line(line, name.as_str()),
                StorageLocation::Stage(_) => Record::parse_line(line),
            };
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping malformed line in {}: {}", location, e),
            }
        }
        Ok(records)
    }
}

/// Run the map phase over every input record as one invocation
pub fn map_phase(op: &dyn StageOperator, records: &[Record]) -> Vec<Emit> {
    let mut emits = op.begin_map();
    for record in records.iter().filter(|r| !r.is_placeholder()) {
        emits.extend(op.map(record));
    }
    emits
}

/// Group emissions by key and reduce each group, in key order.
/// A key whose emissions carry no value still forms a group.
pub fn reduce_phase(op: &dyn StageOperator, emits: Vec<Emit>) -> Vec<Record> {
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for emit in emits {
        let group = groups.entry(emit.key).or_default();
        if let Some(value) = emit.value {
            group.push(value);
        }
    }
    groups
        .iter()
        .flat_map(|(key, values)| op.reduce(key, values))
        .collect()
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
