//! Finding a record's physical row in a freshly fetched snapshot.

use serde::Serialize;

use crate::sheet::{CellValue, cell_text};

/// Where a record sits: its index in the snapshot and its 1-based sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLocation {
    pub snapshot_index: usize,
    pub sheet_row_number: u32,
}

/// Scan `snapshot` for the first row whose identifier cell (the first cell)
/// equals `id` exactly.
///
/// `header_offset` is the sheet row number of `snapshot[0]`. The snapshot must
/// be fetched right before calling this; row numbers go stale as soon as
/// anyone inserts or deletes rows.
pub fn locate(snapshot: &[Vec<CellValue>], id: &str, header_offset: u32) -> Option<RowLocation> {
    snapshot
        .iter()
        .position(|row| row.first().is_some_and(|cell| cell_text(cell) == id))
        .map(|snapshot_index| RowLocation {
            snapshot_index,
            sheet_row_number: snapshot_index as u32 + header_offset,
        })
}
