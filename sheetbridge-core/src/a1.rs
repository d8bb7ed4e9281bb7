//! Building sheet-scoped A1 addresses for remote calls.

use crate::column::number_to_letter;
use crate::error::{SheetsError, SheetsResult};

/// Last column read when fetching a whole sheet.
pub const LAST_READ_COLUMN: &str = "ZZ";

/// Quote a sheet name for use in an A1 reference when it needs it.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// `Sheet1!A1:ZZ` style reference.
pub fn sheet_range(sheet: &str, range: &str) -> String {
    format!("{}!{}", quote_sheet_name(sheet), range)
}

/// Address of a single cell from 1-based row and column numbers.
pub fn cell_address(sheet: &str, row: i64, col: i64) -> SheetsResult<String> {
    if row <= 0 {
        return Err(SheetsError::InvalidArgument(format!(
            "row number must be positive, got {}",
            row
        )));
    }

    let column = number_to_letter(col)?;
    Ok(sheet_range(sheet, &format!("{}{}", column, row)))
}

/// The whole grid, header row included.
pub fn whole_sheet(sheet: &str) -> String {
    sheet_range(sheet, &format!("A1:{}", LAST_READ_COLUMN))
}
