//! TUI rendering traits for sheetbridge types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to sheetbridge-core types using owo_colors.

use owo_colors::OwoColorize;
use sheetbridge_core::column::number_to_letter;
use sheetbridge_core::{CellValue, Record, SearchHit, SheetData, SheetInfo};
use sheetbridge_core::sheet::cell_text;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for SheetInfo {
    fn render(&self) -> String {
        let meta = format!("id {}, {}×{}", self.id, self.row_count, self.column_count);
        format!("📄 {} {}", self.title, meta.dimmed())
    }
}

impl Render for SearchHit {
    fn render(&self) -> String {
        format!("{:>6}  {}", cell_name(self.row, self.col).cyan(), cell_text(&self.value))
    }
}

impl Render for Record {
    fn render(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name.bold(),
            self.email,
            self.role.yellow(),
            self.id.dimmed()
        )
    }
}

/// Cells wider than this are cut with an ellipsis
const MAX_CELL_WIDTH: usize = 30;

impl Render for SheetData {
    fn render(&self) -> String {
        if self.row_count == 0 {
            return "(empty sheet)".dimmed().to_string();
        }

        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.column_count))
            .max()
            .unwrap_or(0);

        let header: Vec<String> = (0..width)
            .map(|c| self.headers.get(c).cloned().unwrap_or_default())
            .collect();
        let body: Vec<Vec<String>> = (0..self.rows.len())
            .map(|r| (0..width).map(|c| self.cell(r, c)).collect())
            .collect();

        let widths: Vec<usize> = (0..width)
            .map(|c| {
                std::iter::once(&header)
                    .chain(body.iter())
                    .map(|row| truncate(&row[c]).chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = vec![format_row(&header, &widths).bold().to_string()];
        lines.extend(body.iter().map(|row| format_row(row, &widths)));
        lines.join("\n")
    }
}

/// Render a range read as tab-separated lines, the way it pastes into a sheet
pub fn render_values(values: &[Vec<CellValue>]) -> String {
    values
        .iter()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>().join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell), width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", cut)
}

/// A1 name of a 1-based cell, e.g. (2, 3) -> "C2"
fn cell_name(row: u32, col: u32) -> String {
    match number_to_letter(col as i64) {
        Ok(letter) => format!("{}{}", letter, row),
        Err(_) => format!("R{}C{}", row, col),
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_cell_name() {
        assert_eq!(cell_name(2, 3), "C2");
        assert_eq!(cell_name(10, 27), "AA10");
    }

    #[test]
    fn test_truncate_long_cells() {
        let long = "x".repeat(40);

        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_format_row_pads_columns() {
        let row = vec!["a".to_string(), "bb".to_string(), "c".to_string()];

        assert_eq!(format_row(&row, &[3, 3, 1]), "a    bb   c");
    }

    #[test]
    fn test_render_values_is_tab_separated() {
        let values = vec![vec![json!("a"), json!(1)], vec![json!(null), json!(true)]];

        assert_eq!(render_values(&values), "a\t1\n\ttrue");
    }
}
