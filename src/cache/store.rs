//! TTL Cache Module
//!
//! Adds expiry on top of a TTL-unaware `KeyValueStore`. Expired entries are
//! evicted lazily on read; nothing sweeps them in the background.

use std::sync::Arc;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::CacheCounters;
use crate::cache::{CacheEntry, CacheStats, CACHE_PREFIX, DEFAULT_TTL};
use crate::error::Result;
use crate::storage::KeyValueStore;

// == Cache Info ==
/// Debug view of one cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    /// A readable entry is stored under the key
    pub exists: bool,
    /// The entry is expired (or missing)
    pub is_expired: bool,
    /// Seconds since the entry was written
    pub age_seconds: u64,
}

impl CacheInfo {
    fn missing() -> Self {
        Self {
            exists: false,
            is_expired: true,
            age_seconds: 0,
        }
    }
}

// == TTL Cache ==
/// Expiring cache over a shared key-value store.
///
/// Every logical key is stored as `<prefix><key>` so the whole namespace can
/// be enumerated and cleared without touching unrelated data. Clones share
/// the store and the statistics.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    default_ttl: Duration,
    counters: Arc<CacheCounters>,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("prefix", &self.prefix)
            .field("default_ttl", &self.default_ttl)
            .field("stats", &self.counters.snapshot())
            .finish()
    }
}

impl TtlCache {
    // == Constructor ==
    /// Creates a cache in the `cache_` namespace with a 30 minute default TTL.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            prefix: CACHE_PREFIX.to_string(),
            default_ttl: DEFAULT_TTL,
            counters: Arc::new(CacheCounters::default()),
        }
    }

    /// Uses `prefix` as the namespace instead of `cache_`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Uses `ttl` for [`set_default`](Self::set_default).
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Returns the namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the TTL used by `set_default`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// # Errors
    /// Serialization and storage failures are returned; callers that treat
    /// the cache as optional may ignore them.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let entry = CacheEntry::new(SerializeRef(value), ttl);
        let json = serde_json::to_string(&entry)?;

        self.store.set_item(&self.namespaced(key), json).await?;
        self.counters.record_write();

        debug!("Cache SET: {} (TTL: {}ms)", key, entry.ttl);
        Ok(())
    }

    /// Stores `value` under `key` with the default TTL.
    pub async fn set_default<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.set(key, value, self.default_ttl).await
    }

    // == Get ==
    /// Returns the live value under `key`.
    ///
    /// An expired entry is deleted and reported as absent. Read and parse
    /// failures are reported as absent too, so a broken store degrades to
    /// cache misses.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let full_key = self.namespaced(key);

        let raw = match self.store.get_item(&full_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                self.counters.record_miss();
                return None;
            }
            Err(err) => {
                warn!("Cache read failed for {}: {}", key, err);
                self.counters.record_miss();
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cache entry for {} is unreadable: {}", key, err);
                self.counters.record_miss();
                return None;
            }
        };

        if !entry.is_live_at(current_timestamp_ms()) {
            debug!("Cache EXPIRED: {}", key);
            self.counters.record_expired();
            if let Err(err) = self.store.remove_item(&full_key).await {
                warn!("Failed to evict expired entry {}: {}", key, err);
            }
            return None;
        }

        debug!("Cache HIT: {}", key);
        self.counters.record_hit();
        Some(entry.value)
    }

    // == Remove ==
    /// Deletes `key`; a missing key is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove_item(&self.namespaced(key)).await?;
        debug!("Cache REMOVED: {}", key);
        Ok(())
    }

    // == Clear All ==
    /// Deletes every entry in this cache's namespace in one batch.
    ///
    /// Returns the number of removed entries.
    pub async fn clear_all(&self) -> Result<usize> {
        let cache_keys: Vec<String> = self
            .store
            .get_all_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(&self.prefix))
            .collect();

        if !cache_keys.is_empty() {
            self.store.multi_remove(&cache_keys).await?;
            info!("Cache CLEARED: {} items", cache_keys.len());
        }

        Ok(cache_keys.len())
    }

    // == Info ==
    /// Reports whether `key` exists, whether it expired, and its age.
    ///
    /// Never evicts; unreadable entries are reported as missing.
    pub async fn info(&self, key: &str) -> CacheInfo {
        let raw = match self.store.get_item(&self.namespaced(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheInfo::missing(),
            Err(err) => {
                warn!("Cache info read failed for {}: {}", key, err);
                return CacheInfo::missing();
            }
        };

        match serde_json::from_str::<CacheEntry<IgnoredAny>>(&raw) {
            Ok(entry) => {
                let now = current_timestamp_ms();
                CacheInfo {
                    exists: true,
                    is_expired: !entry.is_live_at(now),
                    age_seconds: entry.age_ms(now) / 1000,
                }
            }
            Err(err) => {
                warn!("Cache entry for {} is unreadable: {}", key, err);
                CacheInfo::missing()
            }
        }
    }

    // == Stats ==
    /// Returns the current counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }
}

/// Lets unsized values (`str`, slices) sit in a `CacheEntry` by reference.
struct SerializeRef<'a, T: ?Sized>(&'a T);

impl<T: Serialize + ?Sized> Serialize for SerializeRef<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
