//! The remote spreadsheet surface the facade is written against.
//!
//! Request types serialize to the Sheets v4 `spreadsheets.batchUpdate` JSON
//! shapes, so an HTTP implementation can send them as-is.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::SheetsResult;
use crate::range::CellRange;
use crate::sheet::{CellValue, SheetInfo};

/// How the remote store interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Stored verbatim.
    Raw,
    /// Parsed as if typed into the UI (numbers, dates, formulas).
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// Values destined for one A1 range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub range: String,
    pub values: Vec<Vec<CellValue>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dimension {
    Rows,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A span of whole rows or columns, zero-based and end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub start_index: u32,
    pub end_index: u32,
}

impl DimensionRange {
    /// Exactly one row or column at `index`.
    pub fn single(sheet_id: i64, dimension: Dimension, index: u32) -> Self {
        DimensionRange {
            sheet_id,
            dimension,
            start_index: index,
            end_index: index + 1,
        }
    }
}

/// A [`CellRange`] bound to a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
}

impl GridRange {
    pub fn new(sheet_id: i64, range: CellRange) -> Self {
        GridRange {
            sheet_id,
            start_row_index: range.start_row_index,
            end_row_index: range.end_row_index,
            start_column_index: range.start_column_index,
            end_column_index: range.end_column_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub dimension_index: u32,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    pub row_count: u32,
    pub column_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSheetProperties {
    pub title: String,
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSheet {
    pub properties: NewSheetProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheet {
    pub sheet_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleProperties {
    pub sheet_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSheetProperties {
    pub properties: TitleProperties,
    /// Field mask of the properties being written.
    pub fields: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionChange {
    pub range: DimensionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRange {
    pub range: GridRange,
    pub sort_specs: Vec<SortSpec>,
}

/// One structural change in a `spreadsheets.batchUpdate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetRequest {
    AddSheet(AddSheet),
    DeleteSheet(DeleteSheet),
    UpdateSheetProperties(UpdateSheetProperties),
    InsertDimension(DimensionChange),
    DeleteDimension(DimensionChange),
    SortRange(SortRange),
}

impl SheetRequest {
    pub fn add_sheet(title: &str, row_count: u32, column_count: u32) -> Self {
        SheetRequest::AddSheet(AddSheet {
            properties: NewSheetProperties {
                title: title.to_string(),
                grid_properties: GridProperties {
                    row_count,
                    column_count,
                },
            },
        })
    }

    pub fn rename_sheet(sheet_id: i64, title: &str) -> Self {
        SheetRequest::UpdateSheetProperties(UpdateSheetProperties {
            properties: TitleProperties {
                sheet_id,
                title: title.to_string(),
            },
            fields: "title".to_string(),
        })
    }

    pub fn insert(range: DimensionRange) -> Self {
        SheetRequest::InsertDimension(DimensionChange { range })
    }

    pub fn delete(range: DimensionRange) -> Self {
        SheetRequest::DeleteDimension(DimensionChange { range })
    }

    pub fn sort(range: GridRange, column_index: u32, ascending: bool) -> Self {
        let sort_order = if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        };

        SheetRequest::SortRange(SortRange {
            range,
            sort_specs: vec![SortSpec {
                dimension_index: column_index,
                sort_order,
            }],
        })
    }

    /// The request's name in the Sheets API, for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SheetRequest::AddSheet(_) => "addSheet",
            SheetRequest::DeleteSheet(_) => "deleteSheet",
            SheetRequest::UpdateSheetProperties(_) => "updateSheetProperties",
            SheetRequest::InsertDimension(_) => "insertDimension",
            SheetRequest::DeleteDimension(_) => "deleteDimension",
            SheetRequest::SortRange(_) => "sortRange",
        }
    }
}

/// The part of a batch reply the facade reads: the properties of an added sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReply {
    pub added_sheet: Option<SheetInfo>,
}

/// Remote spreadsheet operations, scoped to one spreadsheet document.
///
/// Implementations hold the authenticated client handle. Every call goes to
/// the remote store; nothing is cached between calls.
pub trait SheetsApi: Send + Sync {
    /// `spreadsheets.get`: every sheet in the document.
    fn sheets(&self) -> impl Future<Output = SheetsResult<Vec<SheetInfo>>> + Send;

    /// `spreadsheets.batchUpdate`: one reply per request, in order.
    fn batch_update(
        &self,
        requests: Vec<SheetRequest>,
    ) -> impl Future<Output = SheetsResult<Vec<BatchReply>>> + Send;

    /// `values.get`: rows of the range, trailing empty cells and rows omitted.
    fn get_values(
        &self,
        range: &str,
    ) -> impl Future<Output = SheetsResult<Vec<Vec<CellValue>>>> + Send;

    /// `values.update`: overwrite starting at the range's top-left cell.
    fn update_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> impl Future<Output = SheetsResult<()>> + Send;

    /// `values.append`: write after the last populated row of the range's table.
    fn append_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> impl Future<Output = SheetsResult<()>> + Send;

    /// `values.batchUpdate`: several ranges in one request.
    fn batch_update_values(
        &self,
        data: Vec<ValueRange>,
        input: ValueInputOption,
    ) -> impl Future<Output = SheetsResult<()>> + Send;
}
