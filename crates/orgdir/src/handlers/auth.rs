//! API key authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{handlers::error::error_response, state::AppState};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests without the configured `X-API-KEY` value.
///
/// Passes everything through when no key is configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    let authorised = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|provided| constant_time_eq(provided.as_bytes(), expected.as_bytes()));

    if authorised {
        return next.run(request).await;
    }

    tracing::debug!(
        path = %request.uri().path(),
        "Rejected request without valid API key"
    );
    let mut response = error_response(StatusCode::UNAUTHORIZED, "Invalid or missing API key");
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("API Key"));
    response
}

/// Compares two byte strings without short-circuiting on the first
/// mismatching byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
