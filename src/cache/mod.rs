//! Cache Module
//!
//! Provides expiring caching on top of a persistent key-value store.

mod entry;
mod product;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use product::{ProductCache, PRODUCT_TTL};
pub use stats::CacheStats;
pub use store::{CacheInfo, TtlCache};

// == Public Constants ==
/// Namespace prepended to every logical cache key
pub const CACHE_PREFIX: &str = "cache_";

/// TTL used when the caller does not pick one
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
