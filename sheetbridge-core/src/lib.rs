//! Core types for sheetbridge.
//!
//! This crate holds everything that does not talk HTTP:
//! - `column`, `range`, `a1`: grid coordinates and A1 notation
//! - `locate`, `record`, `records`: id-keyed records stored one per row
//! - `api`: the `SheetsApi` trait a remote client implements
//! - `service`: `SheetService`, the validated operation facade
//! - `protocol`: the JSON command/response protocol over the facade
//! - `config`: settings from ~/.config/sheetbridge/config.toml and the environment

pub mod a1;
pub mod api;
pub mod column;
pub mod config;
pub mod error;
pub mod locate;
pub mod protocol;
pub mod range;
pub mod record;
pub mod records;
pub mod service;
pub mod sheet;

#[cfg(test)]
mod fake;

pub use api::SheetsApi;
pub use config::Settings;
pub use error::{ErrorKind, SheetsError, SheetsResult};
pub use protocol::{Command, Outcome, Response};
pub use range::CellRange;
pub use record::{Record, RecordDraft};
pub use service::SheetService;
pub use sheet::{CellUpdate, CellValue, SearchHit, SheetData, SheetInfo};
