use std::sync::Arc;

use anyhow::{Context, Result};
use sheetbridge_core::{Settings, SheetService};
use sheetbridge_provider_google::GoogleSheets;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Built once at startup; the session inside keeps its token between requests.
    pub service: Arc<SheetService<GoogleSheets>>,
}

impl AppState {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let service = sheetbridge_provider_google::connect(settings)
            .await
            .context("Failed to connect to Google Sheets")?;

        Ok(AppState {
            service: Arc::new(service),
        })
    }
}
