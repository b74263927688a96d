//! Session Module
//!
//! Persists the API access token and its expiry in the key-value store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::auth::LOGIN_ENDPOINT;
use crate::error::{Result, StorageError};
use crate::storage::KeyValueStore;

/// Store key holding the access token
pub const TOKEN_KEY: &str = "auth_token";

/// Store key holding the token expiry (RFC 3339)
pub const TOKEN_EXPIRY_KEY: &str = "token_expired_at";

/// Token lifetime used when the login response does not say otherwise
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

// == Session Store ==
/// Access token storage with expiry tracking.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Creates a session store over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // == Token ==
    /// Saves `token`, valid for `expires_in` from now.
    pub async fn set_token(&self, token: &str, expires_in: Duration) -> Result<()> {
        let lifetime = chrono::Duration::from_std(expires_in)
            .map_err(|err| StorageError::Backend(format!("Invalid token lifetime: {}", err)))?;
        let expires_at = Utc::now() + lifetime;

        self.store
            .set_item(TOKEN_KEY, serde_json::to_string(token)?)
            .await?;
        self.store
            .set_item(TOKEN_EXPIRY_KEY, serde_json::to_string(&expires_at.to_rfc3339())?)
            .await?;

        info!("Token saved, expires at {}", expires_at.to_rfc3339());
        Ok(())
    }

    /// Returns the saved token, if any.
    pub async fn token(&self) -> Result<Option<String>> {
        match self.store.get_item(TOKEN_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns the saved token expiry, if any.
    pub async fn token_expiry(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.store.get_item(TOKEN_EXPIRY_KEY).await? else {
            return Ok(None);
        };

        let text: String = serde_json::from_str(&raw)?;
        let expiry = DateTime::parse_from_rfc3339(&text)
            .map_err(|err| StorageError::Backend(format!("Invalid token expiry: {}", err)))?;
        Ok(Some(expiry.with_timezone(&Utc)))
    }

    /// Returns true once the expiry has been reached.
    ///
    /// A missing or unreadable expiry counts as expired.
    pub async fn is_token_expired(&self) -> bool {
        match self.token_expiry().await {
            Ok(Some(expiry)) => {
                let expired = Utc::now() >= expiry;
                debug!("Token expiry check: {}, expired: {}", expiry.to_rfc3339(), expired);
                expired
            }
            Ok(None) => true,
            Err(err) => {
                warn!("Error checking token expiry: {}", err);
                true
            }
        }
    }

    /// Deletes the token and its expiry.
    pub async fn remove_token(&self) -> Result<()> {
        self.store
            .multi_remove(&[TOKEN_KEY.to_string(), TOKEN_EXPIRY_KEY.to_string()])
            .await?;
        info!("Token removed");
        Ok(())
    }

    // == Validation ==
    /// Checks whether a request to `endpoint` may proceed.
    ///
    /// Login requests always pass; anything else needs a saved, unexpired
    /// token.
    pub async fn validate_for(&self, endpoint: &str) -> bool {
        if endpoint.contains(LOGIN_ENDPOINT) {
            return true;
        }

        let has_token = matches!(self.token().await, Ok(Some(_)));
        let expired = self.is_token_expired().await;

        if !has_token || expired {
            debug!(
                "Token validation failed: has_token={}, expired={}",
                has_token, expired
            );
            return false;
        }

        true
    }

    /// Returns the token only while it is still valid.
    pub async fn valid_token(&self) -> Option<String> {
        if self.is_token_expired().await {
            return None;
        }
        self.token().await.ok().flatten()
    }
}
