//! sheetbridge-provider-google - Google Sheets provider for sheetbridge
//!
//! This binary speaks the sheetbridge command protocol as JSON lines over
//! stdin/stdout: one `Command` per input line, one `Response` per output line.
//!
//! Settings come from ~/.config/sheetbridge/config.toml and `SHEETBRIDGE_*`
//! environment variables. Logs go to stderr (`RUST_LOG`).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use sheetbridge_core::{Command, Response, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load()?;
    let service = sheetbridge_provider_google::connect(&settings)
        .await
        .context("Failed to connect to Google Sheets")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => {
                log::info!("Handling {}", command.action());
                Response::from(service.execute(command).await)
            }
            Err(e) => Response::malformed(format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    Ok(())
}
