//! Record endpoints (id/name/email/role rows on the record sheet)

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post, put},
};
use sheetbridge_core::{Command, RecordDraft};

use crate::routes::{ApiResponse, ApiResult, body, execute};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route("/records/bulk", post(bulk_create_records))
        .route("/records/{id}", put(update_record).delete(delete_record))
}

/// GET /records
async fn list_records(State(state): State<AppState>) -> ApiResponse {
    execute(&state, Command::ListRecords).await
}

/// POST /records - Create a record with a fresh id
async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<RecordDraft>, JsonRejection>,
) -> ApiResult {
    let record = body(payload)?;
    Ok(execute(&state, Command::CreateRecord { record }).await)
}

/// POST /records/bulk - Create many records in one append
async fn bulk_create_records(
    State(state): State<AppState>,
    payload: Result<Json<Vec<RecordDraft>>, JsonRejection>,
) -> ApiResult {
    let records = body(payload)?;
    Ok(execute(&state, Command::BulkCreateRecords { records }).await)
}

/// PUT /records/:id - Overwrite a record
async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RecordDraft>, JsonRejection>,
) -> ApiResult {
    let record = body(payload)?;
    Ok(execute(&state, Command::UpdateRecord { id, record }).await)
}

/// DELETE /records/:id
async fn delete_record(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    execute(&state, Command::DeleteRecord { id }).await
}
