use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

/// Everything that can stop an image from being proxied
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Host not allowed: {0}")]
    ForbiddenHost(String),

    #[error("Upstream responded with {0}")]
    UpstreamStatus(StatusCode),

    #[error("Failed to fetch image: {0}")]
    Fetch(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingUrl => StatusCode::BAD_REQUEST,
            ProxyError::ForbiddenHost(_) => StatusCode::FORBIDDEN,
            ProxyError::UpstreamStatus(status) => *status,
            ProxyError::InvalidUrl(_) | ProxyError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, "{}", self);
        } else {
            warn!(status = %status, "Rejected image proxy request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
