//! `SheetsApi` over the Google Sheets v4 REST API.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use sheetbridge_core::api::{BatchReply, SheetRequest, SheetsApi, ValueInputOption, ValueRange};
use sheetbridge_core::{CellValue, SheetInfo, SheetsError, SheetsResult};
use url::Url;

use crate::session::Session;

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// One spreadsheet document, reached through an authenticated session.
pub struct GoogleSheets {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    session: Session,
}

// Response types matching the Sheets API

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    // Omitted for the first sheet, whose id is 0.
    #[serde(default)]
    sheet_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    grid_properties: GridSize,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridSize {
    #[serde(default)]
    row_count: u32,
    #[serde(default)]
    column_count: u32,
}

impl From<SheetProperties> for SheetInfo {
    fn from(properties: SheetProperties) -> Self {
        SheetInfo {
            id: properties.sheet_id,
            title: properties.title,
            row_count: properties.grid_properties.row_count,
            column_count: properties.grid_properties.column_count,
        }
    }
}

#[derive(Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Reply>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reply {
    add_sheet: Option<Sheet>,
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<CellValue>>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: &str, session: Session, timeout: Duration) -> SheetsResult<Self> {
        Self::with_base_url(SHEETS_BASE_URL, spreadsheet_id, session, timeout)
    }

    pub fn with_base_url(
        base_url: &str,
        spreadsheet_id: &str,
        session: Session,
        timeout: Duration,
    ) -> SheetsResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SheetsError::Config(format!("Invalid Sheets API URL {base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SheetsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(GoogleSheets {
            http,
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            session,
        })
    }

    fn url(&self, segments: &[&str]) -> SheetsResult<Url> {
        endpoint(&self.base_url, segments)
    }

    /// Send an authenticated request and decode a successful JSON reply.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> SheetsResult<T> {
        log::debug!("{} {}", method, url);

        let token = self.session.access_token().await?;
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SheetsError::Transport(format!("Request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SheetsError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let err = classify(status, &text);
            log::warn!("Sheets API returned {}: {}", status, err);
            return Err(err);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl SheetsApi for GoogleSheets {
    async fn sheets(&self) -> SheetsResult<Vec<SheetInfo>> {
        let mut url = self.url(&[&self.spreadsheet_id])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");

        let spreadsheet: Spreadsheet = self.call(Method::GET, url, None).await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.into())
            .collect())
    }

    async fn batch_update(&self, requests: Vec<SheetRequest>) -> SheetsResult<Vec<BatchReply>> {
        let names: Vec<&str> = requests.iter().map(SheetRequest::name).collect();
        log::debug!("batchUpdate: {}", names.join(", "));

        let url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)])?;
        let response: BatchUpdateResponse = self
            .call(Method::POST, url, Some(json!({ "requests": requests })))
            .await?;

        Ok(response
            .replies
            .into_iter()
            .map(|reply| BatchReply {
                added_sheet: reply.add_sheet.map(|sheet| sheet.properties.into()),
            })
            .collect())
    }

    async fn get_values(&self, range: &str) -> SheetsResult<Vec<Vec<CellValue>>> {
        let url = self.url(&[&self.spreadsheet_id, "values", range])?;

        let response: ValuesResponse = self.call(Method::GET, url, None).await?;
        Ok(response.values)
    }

    async fn update_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        let mut url = self.url(&[&self.spreadsheet_id, "values", range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", input.as_str());

        let body = json!({ "range": range, "majorDimension": "ROWS", "values": values });
        let _: IgnoredAny = self.call(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    async fn append_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        let mut url = self.url(&[&self.spreadsheet_id, "values", &format!("{range}:append")])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", input.as_str())
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "range": range, "majorDimension": "ROWS", "values": values });
        let _: IgnoredAny = self.call(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    async fn batch_update_values(
        &self,
        data: Vec<ValueRange>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        let url = self.url(&[&self.spreadsheet_id, "values:batchUpdate"])?;

        let body = json!({ "valueInputOption": input, "data": data });
        let _: IgnoredAny = self.call(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}

/// `base` with `segments` appended, each percent-encoded as one path segment.
fn endpoint(base: &Url, segments: &[&str]) -> SheetsResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SheetsError::Config(format!("Invalid Sheets API URL {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a failed Sheets API reply to an error kind.
fn classify(status: StatusCode, body: &str) -> SheetsError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SheetsError::RemoteAccess(message),
        StatusCode::NOT_FOUND => SheetsError::RemoteNotFound(message),
        StatusCode::TOO_MANY_REQUESTS => SheetsError::RateLimited(message),
        _ => SheetsError::Transport(format!("{}: {}", status, message)),
    }
}
