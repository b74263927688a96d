//! In-Memory Store
//!
//! Process-local `KeyValueStore`, mainly for tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::storage::KeyValueStore;

// == Memory Store ==
/// Key-value store backed by a `HashMap` behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store.set_item("key1", "value1".to_string()).await.unwrap();

        assert_eq!(store.get_item("key1").await.unwrap().as_deref(), Some("value1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get_item("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryStore::new();

        store.set_item("key1", "value1".to_string()).await.unwrap();
        store.set_item("key1", "value2".to_string()).await.unwrap();

        assert_eq!(store.get_item("key1").await.unwrap().as_deref(), Some("value2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.remove_item("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_multi_remove() {
        let store = MemoryStore::new();
        for key in ["a", "b", "c"] {
            store.set_item(key, "1".to_string()).await.unwrap();
        }

        store
            .multi_remove(&["a".to_string(), "c".to_string(), "zzz".to_string()])
            .await
            .unwrap();

        assert_eq!(store.get_all_keys().await.unwrap(), vec!["b".to_string()]);
    }
}
