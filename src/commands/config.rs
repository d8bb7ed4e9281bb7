use anyhow::Result;
use owo_colors::OwoColorize;
use sheetbridge_core::Settings;

pub fn run() -> Result<()> {
    let config_path = Settings::config_path()?;
    let settings = Settings::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:       {}", config_path.display());
    println!(
        "  Credentials:  {}",
        settings
            .credentials_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(inline client_email / private_key)".to_string())
    );

    println!();
    println!("{}", "Settings".bold());
    println!(
        "  Spreadsheet:  {}",
        settings.spreadsheet_id.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Records:      {} from row {}",
        settings.record_sheet, settings.data_start_row
    );
    println!("  Server port:  {}", settings.server_port);
    println!("  Timeout:      {}s", settings.request_timeout_secs);

    if let Err(e) = settings.validate() {
        println!();
        println!("{} {}", "!".yellow(), e);
    }

    Ok(())
}
