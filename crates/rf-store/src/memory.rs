//! In-memory stage store

use crate::error::{StoreError, StoreResult};
use crate::location::StorageLocation;
use crate::traits::StageStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Stage store backed by a map of location to lines
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<StorageLocation, Vec<String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronously seed a location, for fixtures and preloading datasets
    pub fn insert(&self, location: StorageLocation, lines: Vec<String>) -> StoreResult<()> {
        self.lock()?.insert(location, lines);
        Ok(())
    }

    /// Number of locations currently held
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<StorageLocation, Vec<String>>>> {
        self.files
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }
}

#[async_trait]
impl StageStore for MemoryStore {
    async fn read_lines(&self, location: &StorageLocation) -> StoreResult<Vec<String>> {
        self.lock()?
            .get(location)
            .map(|lines| lines.iter().filter(|l| !l.trim().is_empty()).cloned().collect())
            .ok_or_else(|| StoreError::NotFound(location.to_string()))
    }

    async fn write_lines(&self, location: &StorageLocation, lines: &[String]) -> StoreResult<()> {
        self.lock()?.insert(location.clone(), lines.to_vec());
        Ok(())
    }

    async fn exists(&self, location: &StorageLocation) -> StoreResult<bool> {
        Ok(self.lock()?.contains_key(location))
    }

    async fn remove(&self, location: &StorageLocation) -> StoreResult<()> {
        self.lock()?.remove(location);
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let store = MemoryStore::new();
        let loc = StorageLocation::Stage(1);
        store
            .write_lines(&loc, &["a\t{}".to_string(), "".to_string()])
            .await
            .unwrap();
        assert!(store.exists(&loc).await.unwrap());
        assert_eq!(store.read_lines(&loc).await.unwrap(), vec!["a\t{}"]);
    }

    #[tokio::test]
    async fn test_rewrite_replaces_contents() {
        let store = MemoryStore::new();
        let loc = StorageLocation::Stage(2);
        store.write_lines(&loc, &["x\t{}".to_string()]).await.unwrap();
        store.write_lines(&loc, &["y\t{}".to_string()]).await.unwrap();
        assert_eq!(store.read_lines(&loc).await.unwrap(), vec!["y\t{}"]);
    }

    #[tokio::test]
    async fn test_missing_location() {
        let store = MemoryStore::new();
        let err = store.read_lines(&StorageLocation::Stage(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref l) if l == "tmp9.tmp"));
        store.remove(&StorageLocation::Stage(9)).await.unwrap();
    }

    #[test]
    fn test_insert_fixture() {
        let store = MemoryStore::new();
        store
            .insert(StorageLocation::Stage(1), vec!["r\t{}".to_string()])
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.store_type(), "memory");
    }
}
