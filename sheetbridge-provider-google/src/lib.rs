//! Google Sheets backend for sheetbridge.
//!
//! [`GoogleSheets`] implements `SheetsApi` over the Sheets v4 REST API,
//! authenticated by a [`Session`].

pub mod client;
pub mod session;

pub use client::GoogleSheets;
pub use session::{AuthMode, Session};

use sheetbridge_core::{Settings, SheetService, SheetsResult};

/// Build the facade for the configured spreadsheet. Call once per process.
pub async fn connect(settings: &Settings) -> SheetsResult<SheetService<GoogleSheets>> {
    settings.validate()?;

    let session = Session::from_settings(settings).await?;
    let api = GoogleSheets::new(settings.spreadsheet_id()?, session, settings.request_timeout())?;

    Ok(SheetService::new(api)
        .with_record_sheet(settings.record_sheet.clone(), settings.data_start_row))
}
