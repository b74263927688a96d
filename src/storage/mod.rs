//! Storage Module
//!
//! Persistent key-value stores holding UTF-8 JSON text.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;

// == Key-Value Store ==
/// Durable string store with atomic single-key operations.
///
/// Stores know nothing about expiry or value types; callers serialize to
/// JSON before writing.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every stored key.
    async fn get_all_keys(&self) -> Result<Vec<String>>;

    /// Deletes all `keys` in one batch.
    async fn multi_remove(&self, keys: &[String]) -> Result<()>;
}
