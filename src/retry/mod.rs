//! Retry Module
//!
//! Runs fallible async operations again on transient failures, waiting with
//! exponential backoff and jitter between attempts.

mod executor;
mod policy;


pub use executor::{retry_with_backoff, RetryExecutor};
pub use policy::RetryPolicy;

// == Error Classification ==
/// How a failed attempt should be treated by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller cancelled the operation; surfaced immediately, never retried
    Cancelled,
    /// Expected to succeed if retried unchanged (no response, timeout, 5xx)
    Transient,
    /// Retrying cannot help (4xx and everything unclassified)
    Permanent,
}

/// Errors that can tell the executor whether another attempt makes sense.
pub trait Retryable {
    /// Classifies this failure.
    fn classify(&self) -> ErrorClass;

    /// Returns true if the failure is transient.
    fn is_retryable(&self) -> bool {
        self.classify() == ErrorClass::Transient
    }
}
