//! TexTra API Client - Async Rust client for the TexTra machine translation service
//!
//! This library exchanges long-lived API credentials for short-lived OAuth2
//! access tokens, caches them until expiry, and dispatches form-encoded
//! operations (translate, language detection, sentence splitting, resource
//! listing) over the service's single API endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::TexTraClient,
    config::ClientConfig,
    errors::{Result, TexTraError},
    models::{
        ListOptions, OperationRequest, RequestEcho, ResponseCode, ResponseEnvelope,
        TranslateInformation, TranslateResult,
    },
    token::{AccessToken, TokenStore},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
