pub mod config;
pub mod grid;
pub mod records;
pub mod search;
pub mod sheets;

use owo_colors::OwoColorize;
use sheetbridge_core::CellValue;

/// Print the confirmation of a command that returns no data
pub fn confirm(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Cell values typed on the command line. The sheet parses them as if typed in.
pub fn cell_values(values: Vec<String>) -> Vec<CellValue> {
    values.into_iter().map(CellValue::String).collect()
}
