//! File Store
//!
//! `KeyValueStore` persisted as a single JSON object on disk.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::KeyValueStore;

// == File Store ==
/// Durable store that rewrites its backing file on every mutation.
///
/// The whole map lives in memory; the file is written to a sibling temp
/// file first and renamed over the original, so a crash leaves either the
/// old or the new contents. A mutation becomes visible in memory only after
/// its write succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    // == Constructor ==
    /// Opens the store at `path`, loading existing contents.
    ///
    /// A missing file is an empty store; it is created on the first write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        info!("Opened file store at {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Persisted {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.multi_remove(&[key.to_string()]).await
    }

    async fn get_all_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        if !keys.iter().any(|key| entries.contains_key(key)) {
            return Ok(());
        }

        let mut next = entries.clone();
        for key in keys {
            next.remove(key);
        }

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).await.unwrap();

        assert!(store.get_all_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(&path).await.unwrap();
            store.set_item("theme_mode", "\"dark\"".to_string()).await.unwrap();
            store.set_item("cart_items", "[]".to_string()).await.unwrap();
            store.remove_item("cart_items").await.unwrap();
        }

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_item("theme_mode").await.unwrap().as_deref(),
            Some("\"dark\"")
        );
        assert!(reopened.get_item("cart_items").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_multi_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        for key in ["a", "b", "c"] {
            store.set_item(key, "1".to_string()).await.unwrap();
        }
        store
            .multi_remove(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_all_keys().await.unwrap(), vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = FileStore::open(&path).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    /// Replaces the parent directory with a plain file so every write fails
    async fn break_parent_dir(path: &Path) {
        let parent = path.parent().unwrap();
        tokio::fs::remove_dir_all(parent).await.unwrap();
        tokio::fs::write(parent, "not a directory").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set_item("kept", "1".to_string()).await.unwrap();
        break_parent_dir(&path).await;

        assert!(store.set_item("lost", "\"v\"".to_string()).await.is_err());
        assert!(store.get_item("lost").await.unwrap().is_none());
        assert_eq!(store.get_all_keys().await.unwrap(), vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set_item("a", "1".to_string()).await.unwrap();
        store.set_item("b", "2".to_string()).await.unwrap();
        break_parent_dir(&path).await;

        assert!(store.remove_item("a").await.is_err());
        assert!(store
            .multi_remove(&["a".to_string(), "b".to_string()])
            .await
            .is_err());
        assert_eq!(store.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_all_keys().await.unwrap().len(), 2);

        // Removing absent keys never touches the disk
        store.remove_item("missing").await.unwrap();
    }
}
