//! Health check endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /v1/healthz - Liveness probe.
///
/// Returns 200 immediately; does not touch storage or cache.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
