//! CORS middleware.
//! Every response, errors included, carries the same permissive headers.

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
        },
        HeaderMap, HeaderValue, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, X-Direction, X-Hop-Chain, X-Hop-Log";

pub async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .filter(|value| !value.as_bytes().is_empty())
        .cloned();

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut(), origin);
    response
}

/// Reflect the caller's origin, or `*` when there is none.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        origin.unwrap_or_else(|| HeaderValue::from_static("*")),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}

/// Preflight: no content. Headers are added by [`cors_middleware`].
pub async fn preflight_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
