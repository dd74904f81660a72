//! CORS policy.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;

/// Allow the site's own origin to call the form endpoints with cookies.
///
/// A base URL that is not a valid origin produces a layer that allows no
/// cross-origin requests.
#[must_use]
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match origin(&config.base_url) {
        Some(origin) => layer.allow_origin(origin),
        None => {
            tracing::warn!(base_url = %config.base_url, "Base URL is not a valid CORS origin");
            layer
        }
    }
}

/// `scheme://host[:port]` of a URL.
fn origin(base_url: &str) -> Option<HeaderValue> {
    let url = url::Url::parse(base_url).ok()?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    HeaderValue::from_str(&origin.ascii_serialization()).ok()
}
