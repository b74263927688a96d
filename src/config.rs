//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream product API
    pub api_base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Default cache TTL in seconds
    pub cache_default_ttl: u64,
    /// Attempts per upstream call
    pub retry_max_attempts: u32,
    /// First backoff delay in milliseconds
    pub retry_base_delay_ms: u64,
    /// Backoff ceiling in milliseconds
    pub retry_max_delay_ms: u64,
    /// Backoff growth factor
    pub retry_backoff_multiplier: f64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_BASE_URL` - Upstream API (default: https://dummyjson.com)
    /// - `REQUEST_TIMEOUT_MS` - Per-request timeout (default: 15000)
    /// - `STORAGE_PATH` - Key-value store file (default: miniecom-storage.json)
    /// - `CACHE_DEFAULT_TTL` - Default cache TTL in seconds (default: 1800)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per call (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - First backoff delay (default: 1500)
    /// - `RETRY_MAX_DELAY_MS` - Backoff ceiling (default: 8000)
    /// - `RETRY_BACKOFF_MULTIPLIER` - Backoff factor (default: 2.0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            cache_default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.cache_default_ttl),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            retry_max_delay_ms: env_or("RETRY_MAX_DELAY_MS", defaults.retry_max_delay_ms),
            retry_backoff_multiplier: env_or(
                "RETRY_BACKOFF_MULTIPLIER",
                defaults.retry_backoff_multiplier,
            ),
        }
    }

    /// Builds the retry policy for upstream calls.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configured values break the policy
    /// invariants.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let policy = RetryPolicy {
            max_attempts: self.retry_max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            backoff_multiplier: self.retry_backoff_multiplier,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns the default cache TTL.
    pub fn cache_default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_base_url: "https://dummyjson.com".to_string(),
            request_timeout_ms: 15_000,
            storage_path: PathBuf::from("miniecom-storage.json"),
            cache_default_ttl: 1800,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1500,
            retry_max_delay_ms: 8000,
            retry_backoff_multiplier: 2.0,
        }
    }
}

/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.api_base_url, "https://dummyjson.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.cache_default_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = Config::default().retry_policy().unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1500));
        assert_eq!(policy.max_delay, Duration::from_millis(8000));
        assert_eq!(policy.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_invalid_retry_policy_rejected() {
        let config = Config {
            retry_base_delay_ms: 10_000,
            retry_max_delay_ms: 1_000,
            ..Config::default()
        };
        assert!(matches!(
            config.retry_policy(),
            Err(ConfigError::InvalidRetryPolicy(_))
        ));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("MINIECOM_TEST_GARBAGE_PORT", "not-a-number");
        assert_eq!(env_or("MINIECOM_TEST_GARBAGE_PORT", 3000u16), 3000);

        env::set_var("MINIECOM_TEST_VALID_PORT", "8080");
        assert_eq!(env_or("MINIECOM_TEST_VALID_PORT", 3000u16), 8080);

        env::remove_var("MINIECOM_TEST_GARBAGE_PORT");
        env::remove_var("MINIECOM_TEST_VALID_PORT");
    }
}
