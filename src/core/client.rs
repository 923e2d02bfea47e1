//! Async TexTra client: token lifecycle and operation dispatch

use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::auth::Authenticator;
use crate::core::config::ClientConfig;
use crate::core::errors::{Result, TexTraError};
use crate::core::models::{
    ListOptions, OperationRequest, ResponseEnvelope, ResultSet, TranslateResult,
};
use crate::core::token::TokenStore;

/// Async client for the TexTra machine translation API.
///
/// Every operation shares one authenticated dispatch path: the client
/// checks its cached access token before each request, exchanges the
/// credentials for a fresh token when the cache is empty or expired, and
/// then POSTs the form-encoded operation to the API endpoint.
///
/// A declined operation is not an error: the returned envelope carries the
/// service's status code and the caller branches on it. Only transport and
/// decode failures are raised as errors.
///
/// ```no_run
/// use textra_client::{ClientConfig, TexTraClient};
///
/// # async fn run() -> textra_client::Result<()> {
/// let client = TexTraClient::new(ClientConfig::new("name", "key", "secret"))?;
/// let response = client.translate("Hello", "mt", "generalNT_en_ja").await?;
/// if let Some(result) = response.result {
///     println!("{}", result.text);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TexTraClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    auth: Authenticator,
    tokens: Arc<Mutex<TokenStore>>,
}

impl TexTraClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder().build()?;
        let auth = Authenticator::new(
            http.clone(),
            config.auth_url(),
            config.key.clone(),
            config.secret.clone(),
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            auth,
            tokens: Arc::new(Mutex::new(TokenStore::new())),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Translate text with the given engine.
    ///
    /// `api_name` selects the operation (typically `"mt"`) and `api_param`
    /// the engine, e.g. `"generalNT_en_ja"`.
    pub async fn translate(
        &self,
        text: &str,
        api_name: &str,
        api_param: &str,
    ) -> Result<ResponseEnvelope<TranslateResult>> {
        self.request(
            OperationRequest::new(api_name)
                .with_param(api_param)
                .with_text(text),
        )
        .await
    }

    /// Detect the language of a text
    pub async fn detect_language(&self, text: &str) -> Result<ResponseEnvelope> {
        self.request(OperationRequest::new("langdetect").with_text(text))
            .await
    }

    /// Split text into sentences.
    ///
    /// `lang` names the language of the text; when `join` is set the
    /// service re-joins fragments that belong to one sentence.
    pub async fn split(&self, text: &str, lang: &str, join: bool) -> Result<ResponseEnvelope> {
        self.request(
            OperationRequest::new("split")
                .with_text(text)
                .with_field("lang", lang)
                .with_field("join", u8::from(join)),
        )
        .await
    }

    /// List acquisition resources of the given kind.
    ///
    /// Only the options that are set appear in the request.
    pub async fn list_acquisition(
        &self,
        api_name: &str,
        options: &ListOptions,
    ) -> Result<ResponseEnvelope> {
        let mut request = OperationRequest::new(api_name).with_param("get");
        for (key, value) in options.fields() {
            request = request.with_field(key, value);
        }
        self.request(request).await
    }

    /// Dispatch an operation request and decode the response envelope.
    ///
    /// This is the shared path behind every named operation; it can also be
    /// used directly for operations the facade does not cover. The expected
    /// payload type is chosen by the caller; non-zero status codes are
    /// returned in the envelope, never raised.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: OperationRequest,
    ) -> Result<ResponseEnvelope<T>> {
        let access_token = self.ensure_token().await?;
        let pairs = request.form_pairs(&access_token, &self.config.key, &self.config.name);

        let response = self
            .http
            .post(self.config.api_url())
            .form(&pairs)
            .send()
            .await
            .map_err(|e| TexTraError::RequestError {
                message: e.to_string(),
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| TexTraError::RequestError {
                message: e.to_string(),
            })?;

        if body.is_empty() {
            return Err(TexTraError::RequestError {
                message: "API response data is empty".to_string(),
            });
        }

        let decoded: ResultSet<T> =
            serde_json::from_str(&body).map_err(|e| TexTraError::RequestError {
                message: format!("failed to parse API response: {e}"),
            })?;

        debug!(
            "{} responded with code {}",
            request.api_name, decoded.resultset.code
        );
        Ok(decoded.resultset)
    }

    /// Return a valid access token, refreshing it first when the cached
    /// one is absent or expired.
    ///
    /// The store lock is released while the exchange is in flight, so
    /// concurrent dispatches may each trigger a refresh; whichever write
    /// lands last wins and no partially-written token is ever observable.
    async fn ensure_token(&self) -> Result<String> {
        {
            let store = self.tokens.lock().await;
            if store.is_valid() {
                return Ok(store.read()?.value.clone());
            }
        }

        debug!("access token absent or expired, refreshing");
        let token = self.auth.refresh().await?;
        let value = token.value.clone();
        self.tokens.lock().await.write(token);
        Ok(value)
    }
}
