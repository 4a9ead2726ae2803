//! rf-core - Core library for raflow
//!
//! This crate provides shared types used across all raflow components:
//! configuration parsing, the schema directory consumed by the optimizer,
//! tuple/record handling with the shared attribute-resolution rules, and
//! the stage DAG used to validate compiled task graphs.

pub mod config;
pub mod dag;
pub mod error;
pub mod record;
pub mod relation_name;
pub mod resolve;
pub mod schema;
pub(crate) mod serde_helpers;

pub use config::{Config, ExecEnv, OptimizeConfig, OutputFormat};
pub use dag::StageDag;
pub use error::{CoreError, CoreResult};
pub use record::{Record, Tuple, EMPTY_LABEL, RESULT_LABEL};
pub use relation_name::RelationName;
pub use resolve::{qualifier, resolve, suffix, Resolved};
pub use schema::SchemaDirectory;
