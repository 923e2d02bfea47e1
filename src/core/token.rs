//! Access token representation and per-client token storage

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TexTraError};

/// A short-lived OAuth2 access token with its expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The raw bearer token value
    pub value: String,
    /// Instant after which the token must not be used
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token expiring `expires_in_secs` seconds from now.
    ///
    /// The authorization endpoint reports `expires_in` as relative seconds;
    /// the absolute expiry instant is stamped here at issue time.
    pub fn new(value: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            value: value.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// Check whether the token can still be presented to the API.
    ///
    /// A token is valid iff its value is non-empty and the expiry instant
    /// has not been reached.
    pub fn is_valid(&self) -> bool {
        !self.value.is_empty() && Utc::now() < self.expires_at
    }
}

/// Holder for the current access token of one client instance.
///
/// Starts empty; [`TokenStore::write`] replaces the stored token
/// unconditionally, so a refresh is a single atomic swap from the reader's
/// point of view. There is exactly one store per client instance and no
/// process-wide sharing.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: Option<AccessToken>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a token is present and unexpired
    pub fn is_valid(&self) -> bool {
        self.current.as_ref().is_some_and(AccessToken::is_valid)
    }

    /// Read the current token, expired or not.
    ///
    /// Fails with [`TexTraError::NotAuthenticated`] if no token has ever
    /// been written.
    pub fn read(&self) -> Result<&AccessToken> {
        self.current.as_ref().ok_or(TexTraError::NotAuthenticated)
    }

    /// Replace the stored token with a freshly issued one
    pub fn write(&mut self, token: AccessToken) {
        self.current = Some(token);
    }
}
