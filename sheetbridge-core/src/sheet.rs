//! Sheet metadata, snapshots and cell-level values.

use serde::{Deserialize, Serialize};

use crate::error::{SheetsError, SheetsResult};

/// A single cell as exchanged with the remote store (string, number, bool or null).
pub type CellValue = serde_json::Value;

/// Render a cell the way it reads in the sheet. Null is the empty string.
pub fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One tab of a spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub id: i64,
    pub title: String,
    /// Allocated grid size, not the populated size.
    pub row_count: u32,
    pub column_count: u32,
}

/// A full read of a sheet: the first row as headers, the rest as rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Populated rows, header included.
    pub row_count: usize,
    pub column_count: usize,
}

impl SheetData {
    pub fn from_values(mut values: Vec<Vec<CellValue>>) -> Self {
        if values.is_empty() {
            return SheetData::default();
        }

        let row_count = values.len();
        let header_row = values.remove(0);
        let headers: Vec<String> = header_row.iter().map(cell_text).collect();

        SheetData {
            column_count: headers.len(),
            headers,
            rows: values,
            row_count,
        }
    }

    /// Text of a data cell by zero-based data row and column. Sparse cells are empty.
    pub fn cell(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(cell_text)
            .unwrap_or_default()
    }

    /// Case-insensitive substring search over headers, then data rows.
    ///
    /// Hits are in scan order: header row first, then row by row, column by column.
    pub fn search(&self, term: &str) -> SheetsResult<Vec<SearchHit>> {
        if term.trim().is_empty() {
            return Err(SheetsError::Validation("Search query must not be empty".into()));
        }
        let needle = term.to_lowercase();

        let header_hits = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.to_lowercase().contains(&needle))
            .map(|(col, header)| SearchHit {
                row: 1,
                col: col as u32 + 1,
                value: CellValue::String(header.clone()),
            });

        let row_hits = self.rows.iter().enumerate().flat_map(|(row, cells)| {
            let needle = &needle;
            cells
                .iter()
                .enumerate()
                .filter(move |(_, cell)| cell_text(cell).to_lowercase().contains(needle.as_str()))
                .map(move |(col, cell)| SearchHit {
                    row: row as u32 + 2,
                    col: col as u32 + 1,
                    value: cell.clone(),
                })
        });

        Ok(header_hits.chain(row_hits).collect())
    }
}

/// A single-cell write, addressed in 1-based sheet coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub row: i64,
    pub col: i64,
    #[serde(default)]
    pub value: CellValue,
}

/// A search match, in 1-based sheet coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}
