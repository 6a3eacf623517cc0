//! Image proxy for the rewards admin console.
//!
//! Serves `GET /proxy-image?url=<encoded-url>`, fetching images from a fixed
//! set of upstream hosts on behalf of the browser.

pub mod config;
pub mod error;
pub mod image_proxy;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use image_proxy::{HttpImageFetcher, ImageFetcher, ProxyState};

pub fn create_router(state: ProxyState) -> Router {
    Router::new()
        .route("/proxy-image", get(image_proxy::proxy_image))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the admin console origins; unparseable origins are skipped
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = create_router(ProxyState::http().unwrap());
        let response = app
            .oneshot(Request::builder().uri("/images").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = create_router(ProxyState::http().unwrap()).layer(cors_layer(&[
            "http://localhost:8080".to_string(),
            "not a header\n".to_string(),
        ]));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/proxy-image")
                    .header(header::ORIGIN, "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8080"
        );
    }
}
