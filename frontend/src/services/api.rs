use std::fmt;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// Environment variable read by [`ApiClient::from_env`]
pub const BASE_URL_ENV: &str = "REWARDS_API_BASE_URL";

/// Supplies the bearer token attached to every request.
///
/// Called once per request, so a provider may return a different token over
/// time (e.g. after the operator signs in again).
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn bearer_token(&self) -> Option<String> {
        self()
    }
}

/// A fixed token, or none at all
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads the token from an environment variable on every request
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|token| !token.is_empty())
    }
}

/// Errors from talking to the rewards API.
///
/// Clients return these unchanged; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON shape we expected
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// API client for the rewards admin REST API
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_provider: None,
        }
    }

    /// Base URL from `REWARDS_API_BASE_URL`, falling back to the default
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.trim().is_empty() => Self::with_base_url(base_url.trim()),
            _ => Self::new(),
        }
    }

    /// Attach a token provider; its token is sent as `Authorization: Bearer <token>`
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let builder = self.request(method, path).json(body);
        self.execute(builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        info!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.token_provider.as_ref().and_then(|p| p.bearer_token()) {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send and decode; an empty success body decodes to `Value::Null`
    async fn execute(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!("Received {} bytes ({})", bytes.len(), status);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
