//! Stage store trait definition

use crate::error::StoreResult;
use crate::location::StorageLocation;
use async_trait::async_trait;

/// Line-oriented storage shared by the stages of one job
///
/// Implementations must be Send + Sync for async operation. Each stage
/// location is written by exactly one stage; rewriting it replaces the
/// previous contents so a re-executed stage leaves the same result.
#[async_trait]
pub trait StageStore: Send + Sync {
    /// Read every non-empty line of a location
    async fn read_lines(&self, location: &StorageLocation) -> StoreResult<Vec<String>>;

    /// Replace the contents of a location
    async fn write_lines(&self, location: &StorageLocation, lines: &[String]) -> StoreResult<()>;

    /// Check if a location has been written
    async fn exists(&self, location: &StorageLocation) -> StoreResult<bool>;

    /// Delete a location; missing locations are not an error
    async fn remove(&self, location: &StorageLocation) -> StoreResult<()>;

    /// Backend identifier for logging
    fn store_type(&self) -> &'static str;
}
