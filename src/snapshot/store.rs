//! Key-value backends for snapshot documents.

use super::SnapshotError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A store of named text documents.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when nothing was saved under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Replaces the document under `key`.
    async fn save(&self, key: &str, doc: &str) -> Result<(), SnapshotError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SnapshotError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SnapshotError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(doc) => {
                debug!(path = %path.display(), bytes = doc.len(), "Snapshot read");
                Ok(Some(doc))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, doc: &str) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // atomic replace
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, doc).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), bytes = doc.len(), "Snapshot written");
        Ok(())
    }
}

/// In-process store. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.docs
            .lock()
            .ok()
            .and_then(|docs| docs.get(key).cloned())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, doc: &str) -> Result<(), SnapshotError> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|e| SnapshotError::Io(std::io::Error::other(e.to_string())))?;
        docs.insert(key.to_string(), doc.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert_eq!(store.load("restaurantOrders").await.unwrap(), None);
        store.save("restaurantOrders", "{\"history\":[]}").await.unwrap();
        assert_eq!(
            store.load("restaurantOrders").await.unwrap().as_deref(),
            Some("{\"history\":[]}")
        );
        assert!(dir.path().join("state/restaurantOrders.json").exists());
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.save("../escape", "{}").await.unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidKey(_)));
    }
}
