//! Cache Entry Module
//!
//! Defines the persisted record wrapping each cached value with its TTL.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value together with the time it was written and its TTL.
///
/// Serialized as `{"value": ..., "writtenAt": <unix ms>, "ttl": <ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The cached payload
    pub value: T,
    /// Write timestamp (Unix milliseconds)
    pub written_at: i64,
    /// Time to live in milliseconds
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry written now that lives for `ttl`.
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            written_at: current_timestamp_ms(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the expiry timestamp (Unix milliseconds).
    pub fn expires_at(&self) -> i64 {
        let ttl = i64::try_from(self.ttl).unwrap_or(i64::MAX);
        self.written_at.saturating_add(ttl)
    }

    // == Liveness ==
    /// Checks liveness at `now`.
    ///
    /// Boundary condition: the entry is live only while `now < expires_at`;
    /// at exactly `expires_at` it is already expired.
    pub fn is_live_at(&self, now: i64) -> bool {
        now < self.expires_at()
    }

    /// Returns true if the entry has expired at the current time.
    pub fn is_expired(&self) -> bool {
        !self.is_live_at(current_timestamp_ms())
    }

    /// Returns how long ago the entry was written, in milliseconds.
    pub fn age_ms(&self, now: i64) -> u64 {
        u64::try_from(now.saturating_sub(self.written_at)).unwrap_or(0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
