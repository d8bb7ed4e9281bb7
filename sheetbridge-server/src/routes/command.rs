//! Single-endpoint command protocol

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use sheetbridge_core::Command;

use crate::routes::{ApiResult, body, execute};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/command", post(command))
}

/// POST /command - Run any command, e.g. `{"action": "list_sheets"}`
async fn command(
    State(state): State<AppState>,
    payload: Result<Json<Command>, JsonRejection>,
) -> ApiResult {
    let command = body(payload)?;
    Ok(execute(&state, command).await)
}
