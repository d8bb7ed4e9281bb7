//! Sheet, row, column and cell endpoints

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use sheetbridge_core::{CellUpdate, CellValue, Command};

use crate::routes::{ApiResponse, ApiResult, body, execute, optional_body, path};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sheets", get(list_sheets).post(create_sheet))
        .route("/sheets/{sheet}", put(rename_sheet).delete(delete_sheet))
        .route("/sheets/{sheet}/data", get(get_sheet_data))
        .route("/sheets/{sheet}/search", get(search))
        .route("/sheets/{sheet}/cells", put(update_cell))
        .route("/sheets/{sheet}/cells/batch", put(batch_update))
        .route("/sheets/{sheet}/rows", post(append_row))
        .route("/sheets/{sheet}/rows/{index}", post(insert_row).delete(delete_row))
        .route("/sheets/{sheet}/columns", post(add_column))
        .route("/sheets/{sheet}/columns/{index}", delete(delete_column))
        .route("/sheets/{sheet}/sort", post(sort_range))
        .route("/ranges/{range}", get(get_range).put(update_range))
}

/// GET /sheets - List every sheet in the document
async fn list_sheets(State(state): State<AppState>) -> ApiResponse {
    execute(&state, Command::ListSheets).await
}

#[derive(Deserialize)]
struct CreateSheetRequest {
    title: String,
}

/// POST /sheets - Create a sheet
async fn create_sheet(
    State(state): State<AppState>,
    payload: Result<Json<CreateSheetRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    Ok(execute(&state, Command::CreateSheet { title: req.title }).await)
}

#[derive(Deserialize)]
struct RenameSheetRequest {
    new_title: String,
}

/// PUT /sheets/:id - Rename a sheet
async fn rename_sheet(
    State(state): State<AppState>,
    sheet_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RenameSheetRequest>, JsonRejection>,
) -> ApiResult {
    let sheet_id = path(sheet_id)?;
    let req = body(payload)?;
    let command = Command::RenameSheet {
        sheet_id,
        new_title: req.new_title,
    };
    Ok(execute(&state, command).await)
}

/// DELETE /sheets/:id - Delete a sheet
async fn delete_sheet(
    State(state): State<AppState>,
    sheet_id: Result<Path<i64>, PathRejection>,
) -> ApiResult {
    let sheet_id = path(sheet_id)?;
    Ok(execute(&state, Command::DeleteSheet { sheet_id }).await)
}

/// GET /sheets/:name/data - Headers and rows of a sheet
async fn get_sheet_data(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
) -> ApiResponse {
    execute(&state, Command::GetSheetData { sheet_name }).await
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

/// GET /sheets/:name/search?q= - Case-insensitive search
async fn search(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params.map_err(|e| ApiResponse::malformed(e.body_text()))?;
    let command = Command::Search {
        sheet_name,
        query: params.q,
    };
    Ok(execute(&state, command).await)
}

/// PUT /sheets/:name/cells - Write one cell
async fn update_cell(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    payload: Result<Json<CellUpdate>, JsonRejection>,
) -> ApiResult {
    let update = body(payload)?;
    let command = Command::UpdateCell {
        sheet_name,
        row: update.row,
        col: update.col,
        value: update.value,
    };
    Ok(execute(&state, command).await)
}

#[derive(Deserialize)]
struct BatchUpdateRequest {
    updates: Vec<CellUpdate>,
}

/// PUT /sheets/:name/cells/batch - Write many cells at once
async fn batch_update(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    payload: Result<Json<BatchUpdateRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    let command = Command::BatchUpdate {
        sheet_name,
        updates: req.updates,
    };
    Ok(execute(&state, command).await)
}

#[derive(Deserialize)]
struct RowRequest {
    #[serde(default)]
    values: Option<Vec<CellValue>>,
}

/// POST /sheets/:name/rows - Append a row after the last populated one
async fn append_row(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    payload: Result<Json<RowRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    let command = Command::AppendRow {
        sheet_name,
        values: req.values.unwrap_or_default(),
    };
    Ok(execute(&state, command).await)
}

/// POST /sheets/:name/rows/:index - Insert a row, optionally filled
async fn insert_row(
    State(state): State<AppState>,
    params: Result<Path<(String, u32)>, PathRejection>,
    payload: Result<Option<Json<RowRequest>>, JsonRejection>,
) -> ApiResult {
    let (sheet_name, row_index) = path(params)?;
    let values = optional_body(payload)?.and_then(|req| req.values);
    let command = Command::InsertRow {
        sheet_name,
        row_index,
        values,
    };
    Ok(execute(&state, command).await)
}

/// DELETE /sheets/:name/rows/:index - Delete a data row
async fn delete_row(
    State(state): State<AppState>,
    params: Result<Path<(String, u32)>, PathRejection>,
) -> ApiResult {
    let (sheet_name, row_index) = path(params)?;
    Ok(execute(&state, Command::DeleteRow { sheet_name, row_index }).await)
}

#[derive(Deserialize)]
struct AddColumnRequest {
    header_name: String,
    #[serde(default)]
    position: Option<u32>,
}

/// POST /sheets/:name/columns - Insert a column with a header
async fn add_column(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    payload: Result<Json<AddColumnRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    let command = Command::AddColumn {
        sheet_name,
        header_name: req.header_name,
        position: req.position,
    };
    Ok(execute(&state, command).await)
}

/// DELETE /sheets/:name/columns/:index - Delete a column
async fn delete_column(
    State(state): State<AppState>,
    params: Result<Path<(String, u32)>, PathRejection>,
) -> ApiResult {
    let (sheet_name, column_index) = path(params)?;
    let command = Command::DeleteColumn {
        sheet_name,
        column_index,
    };
    Ok(execute(&state, command).await)
}

#[derive(Deserialize)]
struct SortRequest {
    range: String,
    sort_column_index: u32,
    #[serde(default = "ascending")]
    ascending: bool,
}

fn ascending() -> bool {
    true
}

/// POST /sheets/:name/sort - Sort a range by one of its columns
async fn sort_range(
    State(state): State<AppState>,
    Path(sheet_name): Path<String>,
    payload: Result<Json<SortRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    let command = Command::SortRange {
        sheet_name,
        range: req.range,
        sort_column_index: req.sort_column_index,
        ascending: req.ascending,
    };
    Ok(execute(&state, command).await)
}

/// GET /ranges/:range - Read an A1 range such as `Sheet1!A1:C10`
async fn get_range(State(state): State<AppState>, Path(range): Path<String>) -> ApiResponse {
    execute(&state, Command::GetRange { range }).await
}

#[derive(Deserialize)]
struct UpdateRangeRequest {
    values: Vec<Vec<CellValue>>,
}

/// PUT /ranges/:range - Overwrite an A1 range
async fn update_range(
    State(state): State<AppState>,
    Path(range): Path<String>,
    payload: Result<Json<UpdateRangeRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    Ok(execute(&state, Command::UpdateRange { range, values: req.values }).await)
}
