//! CORS preflight handling (C14). `OPTIONS` requests on any route return
//! 200 with the fixed header set from spec §6, mirroring the teacher's
//! `tower_http::cors::CorsLayer` usage in `server.rs` but hand-built since
//! the allow-origin value must reflect the caller's own `Origin` header
//! rather than a static wildcard.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

const MAX_AGE_SECS: &str = "86400";

pub fn preflight_response(origin: Option<&str>) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();

    let allow_origin = origin.unwrap_or("*");
    if let Ok(value) = HeaderValue::from_str(allow_origin) {
        headers.insert("Access-Control-Allow-Origin", value);
    }
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static("GET,POST,OPTIONS"));
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,X-API-Key,Authorization"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static(MAX_AGE_SECS));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_returns_200_with_cors_headers() {
        let response = preflight_response(Some("https://example.com"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Access-Control-Allow-Origin").unwrap(), "https://example.com");
        assert_eq!(response.headers().get("Access-Control-Max-Age").unwrap(), "86400");
    }

    #[test]
    fn preflight_without_origin_falls_back_to_wildcard() {
        let response = preflight_response(None);
        assert_eq!(response.headers().get("Access-Control-Allow-Origin").unwrap(), "*");
    }
}
