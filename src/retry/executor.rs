//! Retry Executor
//!
//! Drives one fallible async operation through its attempts.

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::retry::{ErrorClass, RetryPolicy, Retryable};

// == Retry Executor ==
/// Runs an operation until it succeeds, fails permanently, or runs out of
/// attempts.
///
/// Holds only the policy; nothing carries over between `run` calls.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Creates an executor bound to `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    // == Run ==
    /// Invokes `operation`, retrying transient failures with backoff.
    ///
    /// Success returns immediately. Cancelled and permanent failures are
    /// returned on first occurrence. A transient failure on the last attempt
    /// is returned as the final error.
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.run_until(operation, std::future::pending::<()>())
            .await
    }

    /// Like [`run`](Self::run), but stops waiting as soon as `cancel`
    /// completes.
    ///
    /// `cancel` is only observed during backoff waits; an attempt in flight
    /// runs to completion. When it fires, no further attempt is made and the
    /// last transient error is returned.
    pub async fn run_until<F, Fut, T, E, C>(&self, mut operation: F, cancel: C) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Attempt {}/{}", attempt, max_attempts);

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match err.classify() {
                ErrorClass::Cancelled => {
                    info!("Operation cancelled, not retrying: {}", err);
                    return Err(err);
                }
                ErrorClass::Permanent => {
                    debug!("Not retryable: {}", err);
                    return Err(err);
                }
                ErrorClass::Transient if attempt >= max_attempts => {
                    warn!(
                        "Max retry attempts ({}) reached, last error: {}",
                        max_attempts, err
                    );
                    return Err(err);
                }
                ErrorClass::Transient => {}
            }

            let delay = self.policy.next_delay(attempt);
            info!(
                "Attempt {} failed ({}), waiting {}ms before retry",
                attempt,
                err,
                delay.as_millis()
            );

            tokio::select! {
                biased;
                _ = &mut cancel => {
                    info!("Retry cancelled during backoff after attempt {}", attempt);
                    return Err(err);
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

/// Runs `operation` under `policy` with a one-off executor.
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    RetryExecutor::new(policy.clone()).run(operation).await
}
