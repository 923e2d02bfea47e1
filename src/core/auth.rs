//! OAuth2 client-credentials exchange against the token endpoint

use serde::Deserialize;
use tracing::debug;

use crate::core::errors::{Result, TexTraError};
use crate::core::token::AccessToken;

/// Exchanges the long-lived API credentials for short-lived access tokens.
#[derive(Debug, Clone)]
pub(crate) struct Authenticator {
    http: reqwest::Client,
    auth_url: String,
    key: String,
    secret: String,
}

/// Token grant returned by the authorization endpoint
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    expires_in: i64,
}

impl Authenticator {
    /// Create an authenticator for the given token endpoint
    pub fn new(
        http: reqwest::Client,
        auth_url: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Perform the client-credentials exchange and return a fresh token.
    ///
    /// The service requires the token endpoint URL to be echoed back as the
    /// `urlAccessToken` form field alongside the standard OAuth2 fields.
    /// Transport failures, an empty body and undecodable bodies all surface
    /// as [`TexTraError::AuthError`]; an invalid token is never produced.
    pub async fn refresh(&self) -> Result<AccessToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.key.as_str()),
            ("client_secret", self.secret.as_str()),
            ("urlAccessToken", self.auth_url.as_str()),
        ];

        let response = self
            .http
            .post(&self.auth_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| TexTraError::AuthError {
                message: e.to_string(),
            })?;

        let body = response.text().await.map_err(|e| TexTraError::AuthError {
            message: e.to_string(),
        })?;

        if body.is_empty() {
            return Err(TexTraError::AuthError {
                message: "API response data is empty".to_string(),
            });
        }

        let grant: TokenGrant =
            serde_json::from_str(&body).map_err(|e| TexTraError::AuthError {
                message: format!("failed to parse token response: {e}"),
            })?;

        debug!("issued access token valid for {}s", grant.expires_in);
        Ok(AccessToken::new(grant.access_token, grant.expires_in))
    }
}
