//! Error types for rf-algebra

use thiserror::Error;

/// Relational algebra error type
#[derive(Error, Debug)]
pub enum AlgebraError {
    /// RA001: The text is not valid RA grammar
    #[error("[RA001] RA parse error at offset {position}: {message}")]
    Parse { position: usize, message: String },

    /// RA002: A complete expression was followed by unparsed text
    #[error("[RA002] Unexpected trailing input at offset {position}: '{rest}'")]
    TrailingInput { position: usize, rest: String },

    /// RA003: A fused chain violates its shape constraints
    #[error("[RA003] Invalid chained operator: {reason}")]
    InvalidChain { reason: String },

    /// RA004: A pass filter names a pass that is not registered
    #[error("[RA004] Unknown optimizer pass '{name}' (available: {available})")]
    UnknownPass { name: String, available: String },
}

/// Result type alias for AlgebraError
pub type AlgebraResult<T> = Result<T, AlgebraError>;
