//! A1-notation range parsing.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::column::letter_to_number;
use crate::error::{SheetsError, SheetsResult};

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]+)([1-9][0-9]*):([A-Z]+)([1-9][0-9]*)$").expect("range pattern is valid")
});

/// A rectangular block of cells in zero-based, end-exclusive grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_column_index: u32,
    pub end_column_index: u32,
    pub start_row_index: u32,
    pub end_row_index: u32,
}

impl CellRange {
    /// Parse `"<Col><Row>:<Col><Row>"`, e.g. `"A1:C10"`.
    ///
    /// Any `Sheet!` prefix must already be stripped, see [`split_sheet_prefix`].
    pub fn parse(input: &str) -> SheetsResult<Self> {
        let captures = RANGE_PATTERN.captures(input.trim()).ok_or_else(|| {
            SheetsError::InvalidRange(format!(
                "\"{}\" is not of the form <Col><Row>:<Col><Row> (e.g. A1:C10)",
                input
            ))
        })?;

        let start_column_index = letter_to_number(&captures[1])?;
        let start_row = parse_row(&captures[2], input)?;
        let end_column_index = letter_to_number(&captures[3])?
            .checked_add(1)
            .ok_or_else(|| SheetsError::InvalidRange(format!("\"{}\" is out of bounds", input)))?;
        let end_row = parse_row(&captures[4], input)?;

        if start_column_index >= end_column_index || start_row > end_row {
            return Err(SheetsError::InvalidRange(format!(
                "\"{}\" must start at its top-left cell",
                input
            )));
        }

        Ok(CellRange {
            start_column_index,
            end_column_index,
            start_row_index: start_row - 1,
            end_row_index: end_row,
        })
    }

    pub fn contains_column(&self, column_index: u32) -> bool {
        (self.start_column_index..self.end_column_index).contains(&column_index)
    }

    pub fn column_count(&self) -> u32 {
        self.end_column_index - self.start_column_index
    }

    pub fn row_count(&self) -> u32 {
        self.end_row_index - self.start_row_index
    }
}

impl FromStr for CellRange {
    type Err = SheetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRange::parse(s)
    }
}

fn parse_row(digits: &str, input: &str) -> SheetsResult<u32> {
    digits
        .parse()
        .map_err(|_| SheetsError::InvalidRange(format!("row number in \"{}\" is too large", input)))
}

/// Split `"Sheet1!A1:C10"` into `(Some("Sheet1"), "A1:C10")`.
///
/// Quoted names (`'My Sheet'!A1:B2`) are unquoted, with `''` unescaped.
pub fn split_sheet_prefix(range: &str) -> (Option<String>, &str) {
    match range.rfind('!') {
        Some(pos) => {
            let name = &range[..pos];
            let name = match name.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')) {
                Some(quoted) => quoted.replace("''", "'"),
                None => name.to_string(),
            };
            (Some(name), &range[pos + 1..])
        }
        None => (None, range),
    }
}
