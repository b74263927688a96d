//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::deeplink::DeepLinkAction;

/// Response body for `GET /deeplink`
#[derive(Debug, Clone, Serialize)]
pub struct DeepLinkResponse {
    /// The URL as received
    pub url: String,
    /// The parsed action
    pub action: DeepLinkAction,
}

impl DeepLinkResponse {
    /// Creates a new DeepLinkResponse
    pub fn new(url: impl Into<String>, action: DeepLinkAction) -> Self {
        Self {
            url: url.into(),
            action,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearCacheResponse {
    /// Creates a new ClearCacheResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", removed),
            removed,
        }
    }
}

/// Response body for `POST /auth/logout`
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// Success message
    pub message: String,
}

impl LogoutResponse {
    /// Creates a new LogoutResponse
    pub fn logged_out() -> Self {
        Self {
            message: "Logged out".to_string(),
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Misses caused by expired entries
    pub expired: u64,
    /// Number of cache writes
    pub writes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            writes: stats.writes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deeplink_response_serialize() {
        let resp = DeepLinkResponse::new("miniecom://checkout", DeepLinkAction::Checkout {});
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["url"], "miniecom://checkout");
        assert_eq!(json["action"]["type"], "checkout");
    }

    #[test]
    fn test_clear_cache_response_serialize() {
        let resp = ClearCacheResponse::new(3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"removed\":3"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = StatsResponse::from(CacheStats {
            hits: 80,
            misses: 20,
            expired: 5,
            writes: 100,
        });
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(CacheStats::default());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
