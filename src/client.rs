//! HTTP client for communicating with sheetbridge-server

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sheetbridge_core::{Command, Response, Settings};
use std::time::Duration;

const MAX_RETRIES: u32 = 10;
const RETRY_DELAY_MS: u64 = 200;

/// HTTP client for sheetbridge-server
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Connect to existing server or start one
    pub async fn connect() -> Result<Self> {
        let settings = Settings::load()?;
        let client = Self {
            http: reqwest::Client::new(),
            base_url: format!("http://127.0.0.1:{}", settings.server_port),
        };

        // Try to connect to existing server
        if client.health_check().await.is_ok() {
            return Ok(client);
        }

        // Server not running - start it
        start_server()?;

        // Wait for server to be ready
        for _ in 0..MAX_RETRIES {
            tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            if client.health_check().await.is_ok() {
                return Ok(client);
            }
        }

        anyhow::bail!(
            "Failed to connect to sheetbridge-server after starting it.\n\
            Run `sheetbridge-server` directly to see why it exits, or check `sheetbridge config`."
        )
    }

    async fn health_check(&self) -> Result<()> {
        self.http
            .get(format!("{}/health", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// POST /command - fails with the server's message unless the command succeeded
    pub async fn send(&self, command: &Command) -> Result<Response> {
        let resp = self
            .http
            .post(format!("{}/command", self.base_url))
            .json(command)
            .send()
            .await
            .context("Failed to connect to server")?;

        let response: Response = resp
            .json()
            .await
            .context("Server sent an unreadable response")?;

        if !response.success {
            anyhow::bail!(failure_message(&response));
        }

        Ok(response)
    }

    /// Send a command and decode its `data`.
    pub async fn fetch<T: DeserializeOwned>(&self, command: &Command) -> Result<T> {
        let response = self.send(command).await?;
        let data = response.data.unwrap_or_default();

        serde_json::from_value(data)
            .with_context(|| format!("Unexpected data for {}", command.action()))
    }

    /// Send a command and return its confirmation message.
    pub async fn perform(&self, command: &Command) -> Result<String> {
        let response = self.send(command).await?;
        Ok(response.message.unwrap_or_else(|| "Done".to_string()))
    }
}

fn failure_message(response: &Response) -> String {
    let mut lines = vec![match (&response.error, &response.message) {
        (Some(error), Some(message)) if !message.starts_with(error.as_str()) => {
            format!("{}: {}", error, message)
        }
        (_, Some(message)) => message.clone(),
        (Some(error), None) => error.clone(),
        (None, None) => "Request failed".to_string(),
    }];

    if let Some(details) = &response.details {
        lines.extend(details.iter().map(|d| format!("  - {}", d)));
    }
    if response.state_changed {
        lines.push("The sheet was partly modified before the failure.".to_string());
    }

    lines.join("\n")
}

/// Start the sheetbridge-server process
fn start_server() -> Result<()> {
    std::process::Command::new("sheetbridge-server")
        .spawn()
        .context("Failed to start sheetbridge-server. Is it installed?")?;
    Ok(())
}
