mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::Client;

#[derive(Parser)]
#[command(name = "sheetbridge")]
#[command(about = "Read and edit a Google Sheets document from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, create, rename or delete sheets
    Sheets {
        #[command(subcommand)]
        action: Option<commands::sheets::SheetsAction>,
    },
    /// Print a sheet as a table
    Show { sheet: String },
    /// Read or overwrite an A1 range
    Range {
        #[command(subcommand)]
        action: commands::grid::RangeAction,
    },
    /// Write one cell (1-based row and column)
    Cell {
        sheet: String,
        row: i64,
        col: i64,
        value: String,
    },
    /// Write many cells from a JSON array of {"row", "col", "value"}
    Batch { sheet: String, updates: String },
    /// Append a row after the last populated one
    Append {
        sheet: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Insert a row at a zero-based index
    InsertRow {
        sheet: String,
        index: u32,
        values: Vec<String>,
    },
    /// Delete the row at a zero-based index (the header row is protected)
    DeleteRow { sheet: String, index: u32 },
    /// Insert a column with a header (default: after the last column)
    AddColumn {
        sheet: String,
        header: String,
        /// Zero-based column position
        #[arg(short, long)]
        position: Option<u32>,
    },
    /// Delete the column at a zero-based index
    DeleteColumn { sheet: String, index: u32 },
    /// Sort a range by one of its columns (zero-based sheet column)
    Sort {
        sheet: String,
        range: String,
        column: u32,
        #[arg(long)]
        desc: bool,
    },
    /// Case-insensitive search over a sheet
    Search { sheet: String, query: String },
    /// Manage id/name/email/role records
    Records {
        #[command(subcommand)]
        action: Option<commands::records::RecordsAction>,
    },
    /// Show where settings are read from
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        // Works without a server or valid credentials
        Commands::Config => commands::config::run(),
        command => dispatch(command).await,
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    let client = Client::connect().await?;

    match command {
        Commands::Sheets { action } => commands::sheets::run(&client, action).await,
        Commands::Show { sheet } => commands::sheets::show(&client, sheet).await,
        Commands::Range { action } => commands::grid::range(&client, action).await,
        Commands::Cell {
            sheet,
            row,
            col,
            value,
        } => commands::grid::cell(&client, sheet, row, col, value).await,
        Commands::Batch { sheet, updates } => commands::grid::batch(&client, sheet, &updates).await,
        Commands::Append { sheet, values } => commands::grid::append(&client, sheet, values).await,
        Commands::InsertRow {
            sheet,
            index,
            values,
        } => commands::grid::insert_row(&client, sheet, index, values).await,
        Commands::DeleteRow { sheet, index } => {
            commands::grid::delete_row(&client, sheet, index).await
        }
        Commands::AddColumn {
            sheet,
            header,
            position,
        } => commands::grid::add_column(&client, sheet, header, position).await,
        Commands::DeleteColumn { sheet, index } => {
            commands::grid::delete_column(&client, sheet, index).await
        }
        Commands::Sort {
            sheet,
            range,
            column,
            desc,
        } => commands::grid::sort(&client, sheet, range, column, !desc).await,
        Commands::Search { sheet, query } => commands::search::run(&client, sheet, query).await,
        Commands::Records { action } => commands::records::run(&client, action).await,
        Commands::Config => commands::config::run(),
    }
}
