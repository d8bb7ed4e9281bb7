use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use sheetbridge_core::{Command, SheetData, SheetInfo};

use crate::client::Client;
use crate::commands::confirm;
use crate::render::{Render, pluralize};

#[derive(Subcommand)]
pub enum SheetsAction {
    /// List sheets (default)
    List,
    /// Create an empty 1000×26 sheet
    Create { title: String },
    /// Rename a sheet by id
    Rename { id: i64, title: String },
    /// Delete a sheet by id
    Delete { id: i64 },
}

pub async fn run(client: &Client, action: Option<SheetsAction>) -> Result<()> {
    match action.unwrap_or(SheetsAction::List) {
        SheetsAction::List => {
            let sheets: Vec<SheetInfo> = client.fetch(&Command::ListSheets).await?;

            for sheet in &sheets {
                println!("{}", sheet.render());
            }
            println!(
                "{}",
                format!("{} {}", sheets.len(), pluralize("sheet", sheets.len())).dimmed()
            );
        }
        SheetsAction::Create { title } => {
            let sheet: SheetInfo = client.fetch(&Command::CreateSheet { title }).await?;
            confirm(&format!("Created {}", sheet.render()));
        }
        SheetsAction::Rename { id, title } => {
            let command = Command::RenameSheet {
                sheet_id: id,
                new_title: title,
            };
            confirm(&client.perform(&command).await?);
        }
        SheetsAction::Delete { id } => {
            confirm(&client.perform(&Command::DeleteSheet { sheet_id: id }).await?);
        }
    }

    Ok(())
}

pub async fn show(client: &Client, sheet: String) -> Result<()> {
    let data: SheetData = client
        .fetch(&Command::GetSheetData { sheet_name: sheet })
        .await?;

    println!("{}", data.render());
    Ok(())
}
