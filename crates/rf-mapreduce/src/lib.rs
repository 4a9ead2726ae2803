//! rf-mapreduce: distributed semantics for compiled RA queries
//!
//! This crate compiles an (optimized) RA tree into a DAG of stateless task
//! descriptors, provides the map and reduce bodies each task kind
//! executes, and ships a local async job runner that plays the role of the
//! scheduler and the shuffle.

pub mod compile;
pub mod error;
pub mod eval;
pub mod operators;
pub mod plan;
pub mod runner;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use compile::{compile, stage_count, TaskDescriptor, TaskKind};
pub use error::{ExecError, ExecResult};
pub use eval::{evaluate, holds, Scalar};
pub use operators::{operator_for, Emit, StageOperator};
pub use plan::TaskDag;
pub use runner::JobRunner;
