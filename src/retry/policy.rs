//! Retry Policy Module
//!
//! Defines attempt limits and the backoff curve used between attempts.

use std::time::Duration;

use crate::error::ConfigError;

/// Jitter is drawn from `[0, JITTER_RATIO * base)` for each wait.
pub const JITTER_RATIO: f64 = 0.3;

// == Retry Policy ==
/// Attempt limit and backoff parameters for one retried operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt, before jitter
    pub base_delay: Duration,
    /// Ceiling for any single wait
    pub max_delay: Duration,
    /// Growth factor applied per attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            max_delay: Duration::from_millis(12_000),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    // == Builders ==
    /// Overrides the attempt limit, keeping the other fields.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides the initial backoff delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Overrides the backoff ceiling.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Overrides the growth factor.
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f64) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    // == Validate ==
    /// Checks the policy invariants.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRetryPolicy` when `max_attempts` is zero,
    /// the multiplier is not a finite number above 1, or `base_delay`
    /// exceeds `max_delay`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidRetryPolicy(format!(
                "backoff_multiplier must be greater than 1, got {}",
                self.backoff_multiplier
            )));
        }

        if self.base_delay > self.max_delay {
            return Err(ConfigError::InvalidRetryPolicy(format!(
                "base_delay ({}ms) exceeds max_delay ({}ms)",
                self.base_delay.as_millis(),
                self.max_delay.as_millis()
            )));
        }

        Ok(())
    }

    // == Delay Calculation ==
    /// Computes the wait after failed attempt `attempt` (1-based).
    ///
    /// `jitter_sample` is a value in `[0, 1)` scaled to the jitter range.
    /// The result is `min(base + jitter, max_delay)`, where
    /// `base = base_delay * multiplier^(attempt - 1)`.
    pub fn delay_for(&self, attempt: u32, jitter_sample: f64) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base_ms = (as_millis_f64(self.base_delay) * self.backoff_multiplier.powi(exponent))
            .max(0.0);
        let jitter_ms = base_ms * JITTER_RATIO * jitter_sample.clamp(0.0, 1.0);

        // f64::min discards NaN, so an overflowing curve settles on the ceiling
        let delay_ms = (base_ms + jitter_ms).min(as_millis_f64(self.max_delay));
        Duration::from_nanos((delay_ms * 1_000_000.0).round() as u64)
    }

    /// Computes the wait after failed attempt `attempt` with random jitter.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        self.delay_for(attempt, rand::random::<f64>())
    }
}

fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}
