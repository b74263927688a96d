//! Error types for the storefront core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::retry::{ErrorClass, Retryable};

// == Transport Error ==
/// Failure of a single request against the upstream API.
///
/// Only the classification surface is kept, so the retry layer never has to
/// know which HTTP client produced the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// Request was cancelled or aborted by the caller
    pub cancelled: bool,
    /// No response was received at all (connection failure, DNS, reset)
    pub no_response: bool,
    /// Request hit its timeout
    pub timed_out: bool,
    /// HTTP status code, when a response was received
    pub status: Option<u16>,
    /// Human-readable description
    pub message: String,
}

impl TransportError {
    /// Caller-initiated abort.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            cancelled: true,
            no_response: true,
            timed_out: false,
            status: None,
            message: message.into(),
        }
    }

    /// Network-level failure, nothing came back.
    pub fn no_response(message: impl Into<String>) -> Self {
        Self {
            cancelled: false,
            no_response: true,
            timed_out: false,
            status: None,
            message: message.into(),
        }
    }

    /// Request exceeded its deadline.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            cancelled: false,
            no_response: true,
            timed_out: true,
            status: None,
            message: message.into(),
        }
    }

    /// Upstream answered with a non-success status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            cancelled: false,
            no_response: false,
            timed_out: false,
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Message fragments that mark an abort even when the flag was not set.
const CANCEL_MARKERS: [&str; 3] = ["canceled", "cancelled", "abort"];

impl Retryable for TransportError {
    fn classify(&self) -> ErrorClass {
        let msg = self.message.to_lowercase();

        if self.cancelled || CANCEL_MARKERS.iter().any(|m| msg.contains(m)) {
            return ErrorClass::Cancelled;
        }

        if self.timed_out || msg.contains("timeout") || msg.contains("timed out") {
            return ErrorClass::Transient;
        }

        match self.status {
            None if self.no_response => ErrorClass::Transient,
            Some(status) if (500..600).contains(&status) => ErrorClass::Transient,
            _ => ErrorClass::Permanent,
        }
    }
}

// == Storage Error ==
/// Failure of the persistent key-value store or of entry (de)serialization.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying storage backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be read or written as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure in a file-backed store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Config Error ==
/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Retry policy violates its invariants
    #[error("Invalid retry policy: {0}")]
    InvalidRetryPolicy(String),
}

// == Auth Error ==
/// Failure of a login, logout or session-gated call.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No saved token, or the saved token expired
    #[error("Session expired or missing, please log in")]
    SessionExpired,

    /// Login succeeded upstream but the reply carried no access token
    #[error("Login response did not include an access token")]
    MissingToken,

    /// Auth API call failed
    #[error("Auth request failed: {0}")]
    Transport(#[from] TransportError),

    /// Token could not be saved or removed
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
}

// == Api Error ==
/// Unified error type for the HTTP gateway.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream API call failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] TransportError),

    /// Local storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Login or session check failed
    #[error("{0}")]
    Auth(#[from] AuthError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(err) => upstream_status(err),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => match err {
                AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
                AuthError::MissingToken => StatusCode::BAD_GATEWAY,
                AuthError::Transport(err) if matches!(err.status, Some(400 | 401)) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::Transport(err) => upstream_status(err),
                AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

/// Maps a failed upstream call to the gateway status.
fn upstream_status(err: &TransportError) -> StatusCode {
    match err.status {
        Some(404) => StatusCode::NOT_FOUND,
        _ if err.classify() == ErrorClass::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Convenience Result type for gateway handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_response_is_transient() {
        let err = TransportError::no_response("connection refused");
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[test]
    fn test_timeout_is_transient() {
        assert_eq!(
            TransportError::timeout("deadline").classify(),
            ErrorClass::Transient
        );

        // A received response whose message mentions a timeout still counts
        let err = TransportError::status(408, "timeout of 15000ms exceeded");
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[test]
    fn test_server_errors_are_transient() {
        for status in [500, 502, 503, 599] {
            let err = TransportError::status(status, "server error");
            assert_eq!(err.classify(), ErrorClass::Transient, "status {status}");
        }
    }

    #[test]
    fn test_client_errors_are_permanent() {
        for status in [400, 401, 404, 429, 600] {
            let err = TransportError::status(status, "client error");
            assert_eq!(err.classify(), ErrorClass::Permanent, "status {status}");
        }
    }

    #[test]
    fn test_cancellation_wins_over_other_flags() {
        assert_eq!(
            TransportError::cancelled("user left screen").classify(),
            ErrorClass::Cancelled
        );

        let err = TransportError::status(503, "request aborted");
        assert_eq!(err.classify(), ErrorClass::Cancelled);
    }

    #[test]
    fn test_upstream_404_maps_to_not_found() {
        let response = ApiError::from(TransportError::status(404, "missing")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::from(TransportError::status(500, "boom")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_cancellation_maps_to_unavailable() {
        let response = ApiError::from(TransportError::cancelled("aborted")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        // Classified by message even when the flag is unset
        let response =
            ApiError::from(TransportError::status(502, "request canceled")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_errors_map_to_statuses() {
        let response = ApiError::from(AuthError::SessionExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let rejected = AuthError::from(TransportError::status(400, "Invalid credentials"));
        assert_eq!(
            ApiError::from(rejected).into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let outage = AuthError::from(TransportError::status(503, "unavailable"));
        assert_eq!(
            ApiError::from(outage).into_response().status(),
            StatusCode::BAD_GATEWAY
        );

        let response = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_request_maps_to_bad_request() {
        let response = ApiError::InvalidRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
