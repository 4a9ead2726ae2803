//! Materialized task DAG for planning front-ends

use crate::compile::{compile, TaskDescriptor};
use crate::error::ExecResult;
use rf_algebra::RaExpr;
use rf_core::StageDag;
use std::collections::BTreeMap;

/// Every task of a compiled query, keyed by stage, plus the stage DAG
/// built from their re-derived dependencies.
///
/// Building walks the whole tree, so an unsupported operator anywhere in
/// the query is reported here, before any stage runs.
#[derive(Debug)]
pub struct TaskDag {
    tasks: BTreeMap<u32, TaskDescriptor>,
    edges: BTreeMap<u32, Vec<u32>>,
    dag: StageDag,
    root: u32,
}

impl TaskDag {
    /// Compile `root` at stage 1 and expand its dependencies transitively
    pub fn build(root: &RaExpr, optimize: bool) -> ExecResult<Self> {
        let root_task = compile(root, 1, optimize)?;
        let root_stage = root_task.stage;

        let mut tasks = BTreeMap::new();
        let mut edges = BTreeMap::new();
        let mut pending = vec![root_task];
        let mut stages = Vec::new();

        while let Some(task) = pending.pop() {
            let deps = task.dependencies()?;
            let dep_stages: Vec<u32> = deps.iter().map(|d| d.stage).collect();
            log::debug!(
                "Compiled stage {} ({}) depending on {:?}",
                task.stage,
                task.kind,
                dep_stages
            );
            stages.push((task.stage, dep_stages.clone()));
            edges.insert(task.stage, dep_stages);
            tasks.insert(task.stage, task);
            pending.extend(deps);
        }

        // rejects duplicate stage indices and cycles
        let dag = StageDag::build(&stages)?;

        Ok(Self {
            tasks,
            edges,
            dag,
            root: root_stage,
        })
    }

    /// Tasks with every dependency before its dependents
    pub fn execution_order(&self) -> ExecResult<Vec<&TaskDescriptor>> {
        Ok(self
            .dag
            .execution_order()?
            .into_iter()
            .filter_map(|stage| self.tasks.get(&stage))
            .collect())
    }

    /// The task computing the whole query
    pub fn root(&self) -> Option<&TaskDescriptor> {
        self.tasks.get(&self.root)
    }

    /// Task at a stage index
    pub fn task(&self, stage: u32) -> Option<&TaskDescriptor> {
        self.tasks.get(&stage)
    }

    /// Direct dependencies of a stage, in left-to-right order
    pub fn dependencies(&self, stage: u32) -> &[u32] {
        self.edges.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All tasks in stage order
    pub fn tasks(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{stage_count, TaskKind};
    use rf_algebra::{fold_chains, parse_statement};

    #[test]
    fn test_every_stage_is_unique_and_counted() {
        let t = parse_statement(
            "\\project_{name} \\select_{Person.id = 1} Person \\join_{Person.id = Dept.pid} \\rename_{D:*} \\select_{Dept.id = 10} Dept",
        )
        .unwrap();
        for optimize in [false, true] {
            let dag = TaskDag::build(&t, optimize).unwrap();
            let tree = if optimize { fold_chains(t.clone()) } else { t.clone() };
            assert_eq!(dag.len() as u32, stage_count(&tree));
            let stages: Vec<u32> = dag.tasks().map(|t| t.stage).collect();
            assert_eq!(stages, (1..=dag.len() as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_execution_order_is_dependency_first() {
        let t = parse_statement("\\select_{Person.id = 1} Person \\join_{Person.id = Dept.pid} Dept")
            .unwrap();
        let dag = TaskDag::build(&t, false).unwrap();
        let order: Vec<u32> = dag.execution_order().unwrap().iter().map(|t| t.stage).collect();
        let pos = |s: u32| order.iter().position(|&x| x == s).unwrap();

        assert_eq!(dag.dependencies(1), &[2, 4]);
        assert_eq!(dag.dependencies(2), &[3]);
        assert!(pos(3) < pos(2));
        assert!(pos(2) < pos(1));
        assert!(pos(4) < pos(1));
        assert_eq!(dag.root().map(|t| t.kind), Some(TaskKind::Join));
        assert_eq!(dag.task(4).map(|t| t.kind), Some(TaskKind::Load));
    }

    #[test]
    fn test_nested_cross_fails_before_running() {
        let t = parse_statement("\\project_{name} (Person \\cross Dept)").unwrap();
        assert!(TaskDag::build(&t, true).is_err());
    }
}
