use anyhow::Result;
use owo_colors::OwoColorize;
use sheetbridge_core::{Command, SearchHit};

use crate::client::Client;
use crate::render::{Render, pluralize};

pub async fn run(client: &Client, sheet: String, query: String) -> Result<()> {
    let hits: Vec<SearchHit> = client
        .fetch(&Command::Search {
            sheet_name: sheet,
            query,
        })
        .await?;

    if hits.is_empty() {
        println!("{}", "No matches".dimmed());
        return Ok(());
    }

    for hit in &hits {
        println!("{}", hit.render());
    }
    println!(
        "{}",
        format!("{} {}", hits.len(), pluralize("hit", hits.len())).dimmed()
    );

    Ok(())
}
