//! Custom error types for TexTra API operations

use thiserror::Error;

/// Errors raised by the TexTra client.
///
/// Transport and decode failures are split by the phase they occur in:
/// [`TexTraError::AuthError`] during the token exchange and
/// [`TexTraError::RequestError`] during operation dispatch. A successfully
/// decoded envelope with a non-zero `code` is *not* an error; it is returned
/// to the caller as data.
#[derive(Error, Debug)]
pub enum TexTraError {
    /// Token exchange with the authorization endpoint failed
    #[error("OAuth2 error: {message}")]
    AuthError {
        /// What went wrong during the exchange
        message: String,
    },

    /// Operation dispatch failed at the transport or decode level
    #[error("API request error: {message}")]
    RequestError {
        /// What went wrong during dispatch
        message: String,
    },

    /// An access token was read before any authentication completed
    #[error("not authenticated: no access token has been issued")]
    NotAuthenticated,

    /// Configuration error
    #[error("configuration error: {message}")]
    ConfigError {
        /// Which constraint the configuration violated
        message: String,
    },

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Wrapper for anyhow errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<anyhow::Error> for TexTraError {
    fn from(err: anyhow::Error) -> Self {
        TexTraError::InternalError(err.to_string())
    }
}

/// Result type for TexTra client operations
pub type Result<T> = std::result::Result<T, TexTraError>;
