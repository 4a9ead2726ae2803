//! Error types for rf-core

use thiserror::Error;

/// Core error type for raflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Record line could not be decoded
    #[error("[E003] Malformed record line '{line}': {reason}")]
    MalformedRecord { line: String, reason: String },

    /// E004: Two tasks in one DAG share a stage index
    #[error("[E004] Stage {stage} is assigned to more than one task")]
    DuplicateStage { stage: u32 },

    /// E005: Circular dependency detected
    #[error("[E005] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E006: Dependency refers to a stage that was never added
    #[error("[E006] Stage {stage} depends on unknown stage {dependency}")]
    UnknownStage { stage: u32, dependency: u32 },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
