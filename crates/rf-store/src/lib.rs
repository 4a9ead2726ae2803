//! rf-store - Stage storage for raflow
//!
//! Stages communicate only through materialized, stage-indexed locations.
//! This crate provides the `StageStore` trait and two backends: an
//! in-memory test double and a local single-machine directory.

pub mod error;
pub mod local;
pub mod location;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use local::LocalStore;
pub use location::StorageLocation;
pub use memory::MemoryStore;
pub use traits::StageStore;
