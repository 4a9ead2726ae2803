//! Error types for rf-mapreduce

use thiserror::Error;

/// Execution error type
#[derive(Error, Debug)]
pub enum ExecError {
    /// X001: Operator kind with no physical implementation reached the compiler
    #[error("[X001] Operator '{kind}' is not supported by the task compiler; the optimizer must eliminate it first")]
    UnsupportedOperator { kind: String },

    /// X002: Task descriptor does not describe a runnable task
    #[error("[X002] Malformed task at stage {stage}: {reason}")]
    MalformedTask { stage: u32, reason: String },

    /// X003: RA text or tree error
    #[error("[X003] Algebra error: {0}")]
    Algebra(#[from] rf_algebra::AlgebraError),

    /// X004: Core error propagation
    #[error("[X004] Core error: {0}")]
    Core(#[from] rf_core::CoreError),

    /// X005: Storage error propagation
    #[error("[X005] Storage error: {0}")]
    Store(#[from] rf_store::StoreError),
}

/// Result type alias for ExecError
pub type ExecResult<T> = Result<T, ExecError>;
