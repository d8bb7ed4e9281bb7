use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use owo_colors::OwoColorize;
use sheetbridge_core::{Command, Record, RecordDraft};

use crate::client::Client;
use crate::commands::confirm;
use crate::render::{Render, pluralize};

#[derive(Subcommand)]
pub enum RecordsAction {
    /// List records (default)
    List,
    /// Create a record with a generated id
    Create {
        name: String,
        email: String,
        role: String,
    },
    /// Create records from a JSON file holding an array of {"name", "email", "role"}
    Import { file: PathBuf },
    /// Overwrite the record with this id
    Update {
        id: String,
        name: String,
        email: String,
        role: String,
    },
    /// Delete the record with this id
    Delete { id: String },
}

pub async fn run(client: &Client, action: Option<RecordsAction>) -> Result<()> {
    match action.unwrap_or(RecordsAction::List) {
        RecordsAction::List => {
            let records: Vec<Record> = client.fetch(&Command::ListRecords).await?;

            if records.is_empty() {
                println!("{}", "No records".dimmed());
                return Ok(());
            }
            for record in &records {
                println!("{}", record.render());
            }
            println!(
                "{}",
                format!("{} {}", records.len(), pluralize("record", records.len())).dimmed()
            );
        }
        RecordsAction::Create { name, email, role } => {
            let record = RecordDraft { name, email, role };
            let created: Record = client.fetch(&Command::CreateRecord { record }).await?;
            confirm(&format!("Created {}", created.render()));
        }
        RecordsAction::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let records: Vec<RecordDraft> = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not a JSON array of records", file.display()))?;

            let created: Vec<Record> = client
                .fetch(&Command::BulkCreateRecords { records })
                .await?;
            confirm(&format!(
                "Created {} {}",
                created.len(),
                pluralize("record", created.len())
            ));
        }
        RecordsAction::Update {
            id,
            name,
            email,
            role,
        } => {
            let record = RecordDraft { name, email, role };
            let updated: Record = client.fetch(&Command::UpdateRecord { id, record }).await?;
            confirm(&format!("Updated {}", updated.render()));
        }
        RecordsAction::Delete { id } => {
            confirm(&client.perform(&Command::DeleteRecord { id }).await?);
        }
    }

    Ok(())
}
