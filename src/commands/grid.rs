//! Cell, row and column edits

use anyhow::{Context, Result};
use clap::Subcommand;
use owo_colors::OwoColorize;
use sheetbridge_core::{CellUpdate, CellValue, Command};

use crate::client::Client;
use crate::commands::{cell_values, confirm};
use crate::render::render_values;

#[derive(Subcommand)]
pub enum RangeAction {
    /// Print a range as tab-separated values
    Get { range: String },
    /// Overwrite a range from a JSON array of rows, e.g. '[["a", 1], ["b", 2]]'
    Set { range: String, values: String },
}

pub async fn range(client: &Client, action: RangeAction) -> Result<()> {
    match action {
        RangeAction::Get { range } => {
            let values: Vec<Vec<CellValue>> = client.fetch(&Command::GetRange { range }).await?;

            if values.is_empty() {
                println!("{}", "(empty range)".dimmed());
            } else {
                println!("{}", render_values(&values));
            }
        }
        RangeAction::Set { range, values } => {
            let values: Vec<Vec<CellValue>> =
                serde_json::from_str(&values).context("Values must be a JSON array of rows")?;
            confirm(&client.perform(&Command::UpdateRange { range, values }).await?);
        }
    }

    Ok(())
}

pub async fn cell(client: &Client, sheet: String, row: i64, col: i64, value: String) -> Result<()> {
    let command = Command::UpdateCell {
        sheet_name: sheet,
        row,
        col,
        value: CellValue::String(value),
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn batch(client: &Client, sheet: String, updates: &str) -> Result<()> {
    let updates: Vec<CellUpdate> = serde_json::from_str(updates)
        .context("Updates must be a JSON array of {\"row\", \"col\", \"value\"} objects")?;
    let count = updates.len();

    let command = Command::BatchUpdate {
        sheet_name: sheet,
        updates,
    };
    let message = client.perform(&command).await?;
    confirm(&format!("{} ({} cells)", message, count));
    Ok(())
}

pub async fn append(client: &Client, sheet: String, values: Vec<String>) -> Result<()> {
    let command = Command::AppendRow {
        sheet_name: sheet,
        values: cell_values(values),
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn insert_row(
    client: &Client,
    sheet: String,
    index: u32,
    values: Vec<String>,
) -> Result<()> {
    // No values inserts a blank row
    let values = (!values.is_empty()).then(|| cell_values(values));

    let command = Command::InsertRow {
        sheet_name: sheet,
        row_index: index,
        values,
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn delete_row(client: &Client, sheet: String, index: u32) -> Result<()> {
    let command = Command::DeleteRow {
        sheet_name: sheet,
        row_index: index,
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn add_column(
    client: &Client,
    sheet: String,
    header: String,
    position: Option<u32>,
) -> Result<()> {
    let command = Command::AddColumn {
        sheet_name: sheet,
        header_name: header,
        position,
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn delete_column(client: &Client, sheet: String, index: u32) -> Result<()> {
    let command = Command::DeleteColumn {
        sheet_name: sheet,
        column_index: index,
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}

pub async fn sort(
    client: &Client,
    sheet: String,
    range: String,
    column: u32,
    ascending: bool,
) -> Result<()> {
    let command = Command::SortRange {
        sheet_name: sheet,
        range,
        sort_column_index: column,
        ascending,
    };
    confirm(&client.perform(&command).await?);
    Ok(())
}
