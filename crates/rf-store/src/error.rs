//! Error types for rf-store

use thiserror::Error;

/// Stage storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Location has never been written (ST001)
    #[error("[ST001] Storage location not found: {0}")]
    NotFound(String),

    /// Filesystem error (ST002)
    #[error("[ST002] IO error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Mutex poisoned (ST003)
    #[error("[ST003] Store mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;
