//! Auth Module
//!
//! Login against the upstream auth API, saving the access token in the
//! session store, and session-gated calls that need it.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::{LoginRequest, LoginResponse};
use crate::session::{SessionStore, DEFAULT_TOKEN_LIFETIME};
use crate::transport::Transport;

/// Upstream login endpoint
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Upstream endpoint returning the logged-in user
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";

// == Auth Client ==
/// Logs in and out, keeping the session store in sync.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl AuthClient {
    /// Creates an auth client; `session` should be the one the transport
    /// reads its bearer token from.
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    /// Returns the session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // == Login ==
    /// Logs in and saves the returned access token for
    /// [`DEFAULT_TOKEN_LIFETIME`].
    ///
    /// # Errors
    /// Rejected credentials surface as `AuthError::Transport` with the
    /// upstream status; a reply without `accessToken` is `MissingToken`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
            "expiresInMins": DEFAULT_TOKEN_LIFETIME.as_secs() / 60,
        });

        let response = self.transport.post(LOGIN_ENDPOINT, &body).await?;
        let user: Value = response.json()?;

        let token = user
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingToken)?
            .to_string();

        self.session.set_token(&token, DEFAULT_TOKEN_LIFETIME).await?;
        info!("Logged in as {}", credentials.username);

        Ok(LoginResponse {
            success: true,
            token,
            user,
        })
    }

    // == Logout ==
    /// Forgets the saved token.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.remove_token().await?;
        info!("Logged out");
        Ok(())
    }

    // == Current User ==
    /// Fetches the logged-in user.
    ///
    /// Without a valid token no request is sent: a stale token is removed and
    /// `SessionExpired` returned, so the caller can send the user to login.
    pub async fn current_user(&self) -> Result<Value, AuthError> {
        if !self.session.validate_for(CURRENT_USER_ENDPOINT).await {
            if let Err(err) = self.session.remove_token().await {
                warn!("Failed to clear expired session: {}", err);
            }
            return Err(AuthError::SessionExpired);
        }

        let response = self.transport.get(CURRENT_USER_ENDPOINT, &[]).await?;
        Ok(response.json()?)
    }
}
