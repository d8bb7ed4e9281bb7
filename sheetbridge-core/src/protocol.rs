//! Command protocol types.
//!
//! Every facade operation is one [`Command`] variant, discriminated by an
//! `action` field. Results travel back in a [`Response`] envelope:
//!
//! ```json
//! {"action": "update_cell", "sheet_name": "Sheet1", "row": 2, "col": 3, "value": 42}
//! {"success": true, "message": "Cell updated"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::SheetsApi;
use crate::error::{ErrorKind, SheetsError, SheetsResult};
use crate::record::RecordDraft;
use crate::service::SheetService;
use crate::sheet::{CellUpdate, CellValue};

fn ascending_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    ListSheets,
    CreateSheet {
        title: String,
    },
    RenameSheet {
        sheet_id: i64,
        new_title: String,
    },
    DeleteSheet {
        sheet_id: i64,
    },
    GetSheetData {
        sheet_name: String,
    },
    GetRange {
        range: String,
    },
    UpdateRange {
        range: String,
        values: Vec<Vec<CellValue>>,
    },
    UpdateCell {
        sheet_name: String,
        row: i64,
        col: i64,
        #[serde(default)]
        value: CellValue,
    },
    BatchUpdate {
        sheet_name: String,
        updates: Vec<CellUpdate>,
    },
    AppendRow {
        sheet_name: String,
        values: Vec<CellValue>,
    },
    InsertRow {
        sheet_name: String,
        row_index: u32,
        #[serde(default)]
        values: Option<Vec<CellValue>>,
    },
    DeleteRow {
        sheet_name: String,
        row_index: u32,
    },
    AddColumn {
        sheet_name: String,
        header_name: String,
        #[serde(default)]
        position: Option<u32>,
    },
    DeleteColumn {
        sheet_name: String,
        column_index: u32,
    },
    SortRange {
        sheet_name: String,
        range: String,
        sort_column_index: u32,
        #[serde(default = "ascending_by_default")]
        ascending: bool,
    },
    Search {
        sheet_name: String,
        query: String,
    },
    ListRecords,
    CreateRecord {
        record: RecordDraft,
    },
    BulkCreateRecords {
        records: Vec<RecordDraft>,
    },
    UpdateRecord {
        id: String,
        record: RecordDraft,
    },
    DeleteRecord {
        id: String,
    },
}

impl Command {
    /// The `action` discriminator, for log lines.
    pub fn action(&self) -> &'static str {
        match self {
            Command::ListSheets => "list_sheets",
            Command::CreateSheet { .. } => "create_sheet",
            Command::RenameSheet { .. } => "rename_sheet",
            Command::DeleteSheet { .. } => "delete_sheet",
            Command::GetSheetData { .. } => "get_sheet_data",
            Command::GetRange { .. } => "get_range",
            Command::UpdateRange { .. } => "update_range",
            Command::UpdateCell { .. } => "update_cell",
            Command::BatchUpdate { .. } => "batch_update",
            Command::AppendRow { .. } => "append_row",
            Command::InsertRow { .. } => "insert_row",
            Command::DeleteRow { .. } => "delete_row",
            Command::AddColumn { .. } => "add_column",
            Command::DeleteColumn { .. } => "delete_column",
            Command::SortRange { .. } => "sort_range",
            Command::Search { .. } => "search",
            Command::ListRecords => "list_records",
            Command::CreateRecord { .. } => "create_record",
            Command::BulkCreateRecords { .. } => "bulk_create_records",
            Command::UpdateRecord { .. } => "update_record",
            Command::DeleteRecord { .. } => "delete_record",
        }
    }
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Data(Value),
    /// Data describing something new (a sheet, records).
    Created(Value),
    /// No data, only a confirmation message.
    Done(&'static str),
}

impl Outcome {
    fn data(value: impl Serialize) -> SheetsResult<Self> {
        Ok(Outcome::Data(serde_json::to_value(value)?))
    }

    fn created(value: impl Serialize) -> SheetsResult<Self> {
        Ok(Outcome::Created(serde_json::to_value(value)?))
    }
}

impl<A: SheetsApi> SheetService<A> {
    /// Run one command against the remote spreadsheet.
    pub async fn execute(&self, command: Command) -> SheetsResult<Outcome> {
        match command {
            Command::ListSheets => Outcome::data(self.get_sheets().await?),
            Command::CreateSheet { title } => Outcome::created(self.create_sheet(&title).await?),
            Command::RenameSheet {
                sheet_id,
                new_title,
            } => {
                self.rename_sheet(sheet_id, &new_title).await?;
                Ok(Outcome::Done("Sheet renamed"))
            }
            Command::DeleteSheet { sheet_id } => {
                self.delete_sheet(sheet_id).await?;
                Ok(Outcome::Done("Sheet deleted"))
            }
            Command::GetSheetData { sheet_name } => {
                Outcome::data(self.get_sheet_data(&sheet_name).await?)
            }
            Command::GetRange { range } => Outcome::data(self.get_range(&range).await?),
            Command::UpdateRange { range, values } => {
                self.update_range(&range, values).await?;
                Ok(Outcome::Done("Range updated"))
            }
            Command::UpdateCell {
                sheet_name,
                row,
                col,
                value,
            } => {
                self.update_cell(&sheet_name, row, col, value).await?;
                Ok(Outcome::Done("Cell updated"))
            }
            Command::BatchUpdate {
                sheet_name,
                updates,
            } => {
                self.batch_update(&sheet_name, updates).await?;
                Ok(Outcome::Done("Cells updated"))
            }
            Command::AppendRow { sheet_name, values } => {
                self.append_row(&sheet_name, values).await?;
                Ok(Outcome::Done("Row appended"))
            }
            Command::InsertRow {
                sheet_name,
                row_index,
                values,
            } => {
                self.insert_row(&sheet_name, row_index, values).await?;
                Ok(Outcome::Done("Row inserted"))
            }
            Command::DeleteRow {
                sheet_name,
                row_index,
            } => {
                self.delete_row(&sheet_name, row_index).await?;
                Ok(Outcome::Done("Row deleted"))
            }
            Command::AddColumn {
                sheet_name,
                header_name,
                position,
            } => {
                self.add_column(&sheet_name, &header_name, position).await?;
                Ok(Outcome::Done("Column added"))
            }
            Command::DeleteColumn {
                sheet_name,
                column_index,
            } => {
                self.delete_column(&sheet_name, column_index).await?;
                Ok(Outcome::Done("Column deleted"))
            }
            Command::SortRange {
                sheet_name,
                range,
                sort_column_index,
                ascending,
            } => {
                self.sort_range(&sheet_name, &range, sort_column_index, ascending)
                    .await?;
                Ok(Outcome::Done("Range sorted"))
            }
            Command::Search { sheet_name, query } => {
                Outcome::data(self.search(&sheet_name, &query).await?)
            }
            Command::ListRecords => Outcome::data(self.records().list().await?),
            Command::CreateRecord { record } => {
                Outcome::created(self.records().create(record).await?)
            }
            Command::BulkCreateRecords { records } => {
                Outcome::created(self.records().bulk_create(records).await?)
            }
            Command::UpdateRecord { id, record } => {
                Outcome::data(self.records().update(&id, record).await?)
            }
            Command::DeleteRecord { id } => {
                self.records().delete(&id).await?;
                Ok(Outcome::Done("Record deleted"))
            }
        }
    }
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Set on failures that happened after the sheet was already modified.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub state_changed: bool,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Response {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            details: None,
            kind: None,
            state_changed: false,
        }
    }

    pub fn done(message: &str) -> Self {
        Response {
            success: true,
            data: None,
            error: None,
            message: Some(message.to_string()),
            details: None,
            kind: None,
            state_changed: false,
        }
    }

    pub fn failure(err: &SheetsError) -> Self {
        let kind = err.kind();
        // Remote access failures can echo credential context; keep them generic.
        let message = match kind {
            ErrorKind::RemoteAccess => {
                "The spreadsheet service rejected the credentials".to_string()
            }
            _ => err.to_string(),
        };

        Response {
            success: false,
            data: None,
            error: Some(error_title(kind).to_string()),
            message: Some(message),
            details: err.details().map(<[String]>::to_vec),
            kind: Some(kind),
            state_changed: err.state_changed(),
        }
    }

    /// A request that could not be decoded into a [`Command`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Response {
            success: false,
            data: None,
            error: Some("Invalid request".to_string()),
            message: Some(reason.into()),
            details: None,
            kind: Some(ErrorKind::Validation),
            state_changed: false,
        }
    }
}

impl From<SheetsResult<Outcome>> for Response {
    fn from(result: SheetsResult<Outcome>) -> Self {
        match result {
            Ok(Outcome::Data(data) | Outcome::Created(data)) => Response::ok(data),
            Ok(Outcome::Done(message)) => Response::done(message),
            Err(e) => Response::failure(&e),
        }
    }
}

fn error_title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "Validation failed",
        ErrorKind::NotFound => "Not found",
        ErrorKind::RemoteAccess => "Access denied",
        ErrorKind::RemoteRateLimit => "Rate limited",
        ErrorKind::RemoteTransport => "Spreadsheet request failed",
        ErrorKind::Config => "Configuration error",
    }
}
