use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::{redirect, Url};
use serde::Deserialize;
use tracing::info;

use crate::error::ProxyError;

/// Upstream hosts images may be fetched from
pub const ALLOWED_HOSTS: [&str; 4] = [
    "c.animaapp.com",
    "images.unsplash.com",
    "storage.googleapis.com",
    "lh3.googleusercontent.com",
];

pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// What came back from the upstream image host. The body is streamed, not buffered.
pub struct UpstreamImage {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Body,
}

/// Performs the single outbound request behind each proxied image
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<UpstreamImage, ProxyError>;
}

#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Redirects are never followed: the target host would skip the allow-list.
    /// A 3xx from upstream is handed back as an upstream status instead.
    pub fn new() -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| ProxyError::Fetch(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<UpstreamImage, ProxyError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProxyError::Fetch(e.to_string()))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| ProxyError::Fetch(e.to_string()))?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(UpstreamImage {
            status,
            content_type,
            body: Body::from_stream(response.bytes_stream()),
        })
    }
}

#[derive(Clone)]
pub struct ProxyState {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ProxyState {
    pub fn new(fetcher: impl ImageFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// State backed by a real HTTP client
    pub fn http() -> Result<Self, ProxyError> {
        Ok(Self::new(HttpImageFetcher::new()?))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

pub fn is_allowed_host(host: &str) -> bool {
    ALLOWED_HOSTS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(host))
}

/// Parse the requested URL and make sure its host is on the allow-list
pub fn check_url(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|e| ProxyError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.host_str() {
        Some(host) if is_allowed_host(host) => Ok(url),
        host => Err(ProxyError::ForbiddenHost(host.unwrap_or_default().to_string())),
    }
}

/// `GET /proxy-image?url=<encoded-url>`
pub async fn proxy_image(
    State(state): State<ProxyState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ProxyError> {
    let raw = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ProxyError::MissingUrl)?;
    let url = check_url(raw.trim())?;

    info!("Proxying image from {}", url);
    let upstream = state.fetcher.fetch(&url).await?;
    if !upstream.status.is_success() {
        return Err(ProxyError::UpstreamStatus(upstream.status));
    }

    let content_type = upstream
        .content_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        upstream.body,
    )
        .into_response())
}
