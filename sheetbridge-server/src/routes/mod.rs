pub mod command;
pub mod health;
pub mod records;
pub mod sheets;

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sheetbridge_core::{Command, ErrorKind, Outcome, Response as Envelope, SheetsResult};

use crate::state::AppState;

/// The response envelope with the HTTP status it goes out with.
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    body: Envelope,
}

/// Handlers return the rejection envelope as their error.
pub type ApiResult = Result<ApiResponse, ApiResponse>;

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<SheetsResult<Outcome>> for ApiResponse {
    fn from(result: SheetsResult<Outcome>) -> Self {
        let status = match &result {
            Ok(Outcome::Created(_)) => StatusCode::CREATED,
            Ok(_) => StatusCode::OK,
            Err(e) => status_for(e.kind()),
        };

        ApiResponse {
            status,
            body: Envelope::from(result),
        }
    }
}

impl ApiResponse {
    fn malformed(reason: impl Into<String>) -> Self {
        ApiResponse {
            status: StatusCode::BAD_REQUEST,
            body: Envelope::malformed(reason),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::RemoteRateLimit => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::RemoteAccess | ErrorKind::RemoteTransport => StatusCode::BAD_GATEWAY,
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Unwrap a JSON body, answering undecodable bodies with a 400 envelope.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiResponse> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiResponse::malformed(rejection.body_text()))
}

/// An optional JSON body: absent is `None`, undecodable is a 400 envelope.
pub fn optional_body<T>(
    payload: Result<Option<Json<T>>, JsonRejection>,
) -> Result<Option<T>, ApiResponse> {
    payload
        .map(|body| body.map(|Json(value)| value))
        .map_err(|rejection| ApiResponse::malformed(rejection.body_text()))
}

/// Unwrap path parameters; a non-numeric id or index is a 400 envelope.
pub fn path<T>(params: Result<Path<T>, PathRejection>) -> Result<T, ApiResponse> {
    params
        .map(|Path(value)| value)
        .map_err(|rejection| ApiResponse::malformed(rejection.body_text()))
}

/// Run one command and log how it went.
pub async fn execute(state: &AppState, command: Command) -> ApiResponse {
    let action = command.action();
    let result = state.service.execute(command).await;

    match &result {
        Ok(_) => log::info!("{} succeeded", action),
        Err(e) if e.state_changed() => log::error!("{} partially applied: {}", action, e),
        Err(e) => log::warn!("{} failed: {}", action, e),
    }

    ApiResponse::from(result)
}
