//! RA tree to task descriptor compilation
//!
//! A task descriptor is the whole unit of work a stage needs: its kind, the
//! RA text of the subtree it computes, its stage index and whether chain
//! folding is on. Children are never carried inside a descriptor; they are
//! recomputed on demand by re-parsing the query text, so a descriptor is
//! safe to ship to any worker.
//!
//! Stage indices follow a pre-order layout: a unary node at stage `s` has
//! its child at `s + 1`; a join at `s` has its left child at `s + 1` and
//! its right child at `s + 1 + stage_count(left)`.

use crate::error::{ExecError, ExecResult};
use crate::operators::{operator_for, StageOperator};
use rf_algebra::{fold_chains, parse_statement, RaExpr};
use rf_core::RelationName;
use rf_store::StorageLocation;
use std::fmt;

/// Kind of work a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Base dataset; no computation, its output is the dataset file
    Load,
    Select,
    Project,
    Rename,
    Chained,
    Join,
}

impl TaskKind {
    /// Lowercase name used in plans and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Load => "load",
            TaskKind::Select => "select",
            TaskKind::Project => "project",
            TaskKind::Rename => "rename",
            TaskKind::Chained => "chained",
            TaskKind::Join => "join",
        }
    }

    /// Whether the task runs a reduce phase
    pub fn has_reduce(&self) -> bool {
        matches!(self, TaskKind::Project | TaskKind::Chained | TaskKind::Join)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable description of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub kind: TaskKind,
    /// RA statement text of the subtree this task computes
    pub query: String,
    pub stage: u32,
    pub optimize: bool,
}

/// Compile the root of `node` into a task at `stage`.
///
/// With `optimize` the tree is chain-folded first, so a run of unary
/// operators becomes one `Chained` task.
pub fn compile(node: &RaExpr, stage: u32, optimize: bool) -> ExecResult<TaskDescriptor> {
    let node = if optimize {
        fold_chains(node.clone())
    } else {
        node.clone()
    };

    let kind = match &node {
        RaExpr::Relation(_) => TaskKind::Load,
        RaExpr::Select { .. } => TaskKind::Select,
        RaExpr::Project { .. } => TaskKind::Project,
        RaExpr::Rename { .. } => TaskKind::Rename,
        RaExpr::Chained { .. } => TaskKind::Chained,
        RaExpr::Join { .. } => TaskKind::Join,
        RaExpr::Cross { .. } => {
            return Err(ExecError::UnsupportedOperator {
                kind: node.kind().to_string(),
            })
        }
    };

    Ok(TaskDescriptor {
        kind,
        query: node.to_statement(),
        stage,
        optimize,
    })
}

/// Number of stages a subtree occupies, leaves included.
///
/// A chained node is one stage regardless of how many steps it folds.
/// Cross products are counted like joins even though they never compile.
pub fn stage_count(node: &RaExpr) -> u32 {
    match node {
        RaExpr::Relation(_) => 1,
        RaExpr::Select { input, .. }
        | RaExpr::Project { input, .. }
        | RaExpr::Rename { input, .. }
        | RaExpr::Chained { input, .. } => 1 + stage_count(input),
        RaExpr::Join { left, right, .. } | RaExpr::Cross { left, right } => {
            1 + stage_count(left) + stage_count(right)
        }
    }
}

impl TaskDescriptor {
    /// Re-parse the query text, re-folding when chain folding is on
    pub fn tree(&self) -> ExecResult<RaExpr> {
        let tree = parse_statement(&self.query)?;
        Ok(if self.optimize {
            fold_chains(tree)
        } else {
            tree
        })
    }

    /// Child tasks, left before right
    pub fn dependencies(&self) -> ExecResult<Vec<TaskDescriptor>> {
        let tree = self.tree()?;
        let next = self.stage + 1;
        match &tree {
            RaExpr::Relation(_) => Ok(Vec::new()),
            RaExpr::Select { input, .. }
            | RaExpr::Project { input, .. }
            | RaExpr::Rename { input, .. }
            | RaExpr::Chained { input, .. } => Ok(vec![compile(input, next, self.optimize)?]),
            RaExpr::Join { left, right, .. } => Ok(vec![
                compile(left, next, self.optimize)?,
                compile(right, next + stage_count(left), self.optimize)?,
            ]),
            RaExpr::Cross { .. } => Err(ExecError::UnsupportedOperator {
                kind: tree.kind().to_string(),
            }),
        }
    }

    /// Physical operator for non-load tasks
    pub fn operator(&self) -> ExecResult<Box<dyn StageOperator>> {
        operator_for(&self.tree()?)
    }

    /// Where this task's output lives: the dataset for a load, the stage
    /// location otherwise
    pub fn output_location(&self) -> ExecResult<StorageLocation> {
        if self.kind != TaskKind::Load {
            return Ok(StorageLocation::Stage(self.stage));
        }
        match self.tree()? {
            RaExpr::Relation(name) => RelationName::try_new(name.as_str())
                .map(StorageLocation::Dataset)
                .ok_or_else(|| ExecError::MalformedTask {
                    stage: self.stage,
                    reason: format!("'{name}' is not a valid relation name"),
                }),
            other => Err(ExecError::MalformedTask {
                stage: self.stage,
                reason: format!("load task over a {} node", other.kind()),
            }),
        }
    }
}

#[cfg(test)]
#[path = "compile_test.rs"]
mod tests;
