//! Cross-origin policy for browser clients.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// `*` mirrors the caller's origin; anything else pins that single origin.
///
/// An origin that is not a valid header value falls back to mirroring and
/// logs a warning, so a typo never locks every browser out.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(cors_origin = %origin, "CORS_ORIGIN is not a valid header value, mirroring request origin");
                AllowOrigin::mirror_request()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
