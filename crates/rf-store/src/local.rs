//! Local-directory stage store

use crate::error::{StoreError, StoreResult};
use crate::location::StorageLocation;
use crate::traits::StageStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stage store that keeps every location as a file under one directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a location
    pub fn path_of(&self, location: &StorageLocation) -> PathBuf {
        self.root.join(location.file_name())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl StageStore for LocalStore {
    async fn read_lines(&self, location: &StorageLocation) -> StoreResult<Vec<String>> {
        let path = self.path_of(location);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn write_lines(&self, location: &StorageLocation, lines: &[String]) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;

        let path = self.path_of(location);
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        log::debug!("Writing {} lines to {}", lines.len(), path.display());
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn exists(&self, location: &StorageLocation) -> StoreResult<bool> {
        let path = self.path_of(location);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn remove(&self, location: &StorageLocation) -> StoreResult<()> {
        let path = self.path_of(location);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn store_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
