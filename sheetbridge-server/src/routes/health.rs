//! Liveness endpoint, used by the CLI to find a running server

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub fn router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/health", get(health))
}

/// GET /health - Never touches the spreadsheet
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
