//! Authentication models

use serde::{Deserialize, Serialize};

/// Credentials for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Some("Username and password are required".to_string());
        }
        None
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Access token, also saved in the session store
    pub token: String,
    /// Raw user record returned by the auth API
    pub user: serde_json::Value,
}
