//! Client configuration management

use serde::{Deserialize, Serialize};

/// Default base URL of the TexTra service
const DEFAULT_BASE_URL: &str = "https://mt-auto-minhon-mlt.ucri.jgn-x.jp";

/// Configuration for a TexTra client instance.
///
/// The three credentials (`name`, `key`, `secret`) are issued by the
/// service at registration time and stay immutable for the lifetime of a
/// client. The base URL defaults to the production service and is only
/// overridden for testing against a local endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registered user name
    pub name: String,
    /// API key, doubling as the OAuth2 `client_id`
    pub key: String,
    /// API secret, doubling as the OAuth2 `client_secret`
    pub secret: String,
    /// Base URL of the service, without a trailing slash
    pub base_url: String,
}

impl ClientConfig {
    /// Create a configuration for the production service
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            secret: secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the service base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `TEXTRA_NAME`, `TEXTRA_KEY` and `TEXTRA_SECRET`; the base URL
    /// can be overridden with `TEXTRA_BASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let name = std::env::var("TEXTRA_NAME")
            .map_err(|_| anyhow::anyhow!("TEXTRA_NAME environment variable is required"))?;

        let key = std::env::var("TEXTRA_KEY")
            .map_err(|_| anyhow::anyhow!("TEXTRA_KEY environment variable is required"))?;

        let secret = std::env::var("TEXTRA_SECRET")
            .map_err(|_| anyhow::anyhow!("TEXTRA_SECRET environment variable is required"))?;

        let base_url = std::env::var("TEXTRA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            name,
            key,
            secret,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.is_empty() {
            return Err(anyhow::anyhow!("user name is required"));
        }

        if self.key.is_empty() {
            return Err(anyhow::anyhow!("API key is required"));
        }

        if self.secret.is_empty() {
            return Err(anyhow::anyhow!("API secret is required"));
        }

        if self.base_url.is_empty() {
            return Err(anyhow::anyhow!("base URL is required"));
        }

        Ok(())
    }

    /// URL of the OAuth2 token endpoint
    pub fn auth_url(&self) -> String {
        format!("{}/oauth2/token.php", self.base_url)
    }

    /// URL of the API endpoint shared by every operation
    pub fn api_url(&self) -> String {
        format!("{}/api/", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::new("user", "key", "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let config = ClientConfig::new("user", "key", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig::new("user", "key", "secret");
        assert_eq!(
            config.auth_url(),
            "https://mt-auto-minhon-mlt.ucri.jgn-x.jp/oauth2/token.php"
        );
        assert_eq!(
            config.api_url(),
            "https://mt-auto-minhon-mlt.ucri.jgn-x.jp/api/"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let config =
            ClientConfig::new("user", "key", "secret").with_base_url("http://localhost:8080/");
        assert_eq!(config.auth_url(), "http://localhost:8080/oauth2/token.php");
        assert_eq!(config.api_url(), "http://localhost:8080/api/");
    }
}
