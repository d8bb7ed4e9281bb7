//! Sheet operation facade.
//!
//! Every method is an independent round trip: it fetches whatever metadata it
//! needs, validates its preconditions, converts coordinates, then issues the
//! mutation. Nothing is cached between calls, so two concurrent callers
//! editing the same sheet are not coordinated; the remote store decides the
//! order of their writes.

use log::{info, warn};

use crate::a1;
use crate::api::{
    DeleteSheet, Dimension, DimensionRange, GridRange, SheetRequest, SheetsApi, ValueInputOption,
    ValueRange,
};
use crate::error::{SheetsError, SheetsResult};
use crate::range::{CellRange, split_sheet_prefix};
use crate::records::RecordStore;
use crate::sheet::{CellUpdate, CellValue, SearchHit, SheetData, SheetInfo};

/// Largest number of cell updates accepted in one batch.
pub const MAX_BATCH_UPDATES: usize = 1000;

/// Grid size of newly created sheets.
pub const NEW_SHEET_ROWS: u32 = 1000;
pub const NEW_SHEET_COLUMNS: u32 = 26;

pub const DEFAULT_RECORD_SHEET: &str = "Sheet1";
pub const DEFAULT_DATA_START_ROW: u32 = 2;

pub struct SheetService<A> {
    api: A,
    record_sheet: String,
    data_start_row: u32,
}

impl<A: SheetsApi> SheetService<A> {
    pub fn new(api: A) -> Self {
        SheetService {
            api,
            record_sheet: DEFAULT_RECORD_SHEET.to_string(),
            data_start_row: DEFAULT_DATA_START_ROW,
        }
    }

    /// Where the `{id, name, email, role}` records live.
    pub fn with_record_sheet(mut self, sheet: impl Into<String>, data_start_row: u32) -> Self {
        self.record_sheet = sheet.into();
        self.data_start_row = data_start_row.max(1);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn records(&self) -> RecordStore<'_, A> {
        RecordStore::new(&self.api, &self.record_sheet, self.data_start_row)
    }

    // ------------------------------------------------------------------
    // Sheets
    // ------------------------------------------------------------------

    pub async fn get_sheets(&self) -> SheetsResult<Vec<SheetInfo>> {
        self.api.sheets().await
    }

    /// Create a tab. The duplicate-title check is best effort: another writer
    /// can create the same title between the check and the create.
    pub async fn create_sheet(&self, title: &str) -> SheetsResult<SheetInfo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SheetsError::Validation("Sheet title must not be empty".into()));
        }

        let sheets = self.api.sheets().await?;
        if sheets.iter().any(|s| same_title(&s.title, title)) {
            return Err(SheetsError::Validation(format!(
                "A sheet named \"{}\" already exists",
                title
            )));
        }

        let replies = self
            .api
            .batch_update(vec![SheetRequest::add_sheet(
                title,
                NEW_SHEET_ROWS,
                NEW_SHEET_COLUMNS,
            )])
            .await?;

        let sheet = replies
            .into_iter()
            .find_map(|reply| reply.added_sheet)
            .ok_or_else(|| {
                SheetsError::Serialization("addSheet reply carried no sheet properties".into())
            })?;

        info!("Created sheet \"{}\" (id {})", sheet.title, sheet.id);
        Ok(sheet)
    }

    pub async fn rename_sheet(&self, sheet_id: i64, new_title: &str) -> SheetsResult<()> {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return Err(SheetsError::Validation("Sheet title must not be empty".into()));
        }

        let sheets = self.api.sheets().await?;
        if !sheets.iter().any(|s| s.id == sheet_id) {
            return Err(SheetsError::SheetNotFound(sheet_id.to_string()));
        }
        if sheets
            .iter()
            .any(|s| s.id != sheet_id && same_title(&s.title, new_title))
        {
            return Err(SheetsError::Validation(format!(
                "A sheet named \"{}\" already exists",
                new_title
            )));
        }

        self.api
            .batch_update(vec![SheetRequest::rename_sheet(sheet_id, new_title)])
            .await?;

        info!("Renamed sheet {} to \"{}\"", sheet_id, new_title);
        Ok(())
    }

    pub async fn delete_sheet(&self, sheet_id: i64) -> SheetsResult<()> {
        let sheets = self.api.sheets().await?;
        if !sheets.iter().any(|s| s.id == sheet_id) {
            return Err(SheetsError::SheetNotFound(sheet_id.to_string()));
        }
        if sheets.len() <= 1 {
            return Err(SheetsError::Validation(
                "Cannot delete the only sheet in the spreadsheet".into(),
            ));
        }

        self.api
            .batch_update(vec![SheetRequest::DeleteSheet(DeleteSheet { sheet_id })])
            .await?;

        info!("Deleted sheet {}", sheet_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub async fn get_sheet_data(&self, sheet: &str) -> SheetsResult<SheetData> {
        let values = self.api.get_values(&a1::whole_sheet(sheet)).await?;
        Ok(SheetData::from_values(values))
    }

    /// Read an arbitrary A1 range, e.g. `Sheet1!A1:C10`.
    pub async fn get_range(&self, range: &str) -> SheetsResult<Vec<Vec<CellValue>>> {
        require_range(range)?;
        self.api.get_values(range).await
    }

    pub async fn update_range(&self, range: &str, values: Vec<Vec<CellValue>>) -> SheetsResult<()> {
        require_range(range)?;
        if values.is_empty() {
            return Err(SheetsError::Validation("At least one row of values is required".into()));
        }

        self.api
            .update_values(range, values, ValueInputOption::UserEntered)
            .await
    }

    /// Write one cell. `row` and `col` are 1-based.
    pub async fn update_cell(
        &self,
        sheet: &str,
        row: i64,
        col: i64,
        value: CellValue,
    ) -> SheetsResult<()> {
        let address = a1::cell_address(sheet, row, col)?;
        self.api
            .update_values(&address, vec![vec![value]], ValueInputOption::UserEntered)
            .await
    }

    /// Write many cells in one request. If the remote call fails, some of the
    /// cells may already have been written; the failure is reported once.
    pub async fn batch_update(&self, sheet: &str, updates: Vec<CellUpdate>) -> SheetsResult<()> {
        if updates.is_empty() {
            return Err(SheetsError::Validation("At least one cell update is required".into()));
        }
        if updates.len() > MAX_BATCH_UPDATES {
            return Err(SheetsError::Validation(format!(
                "At most {} cell updates are allowed per batch, got {}",
                MAX_BATCH_UPDATES,
                updates.len()
            )));
        }

        let data = updates
            .into_iter()
            .map(|update| {
                Ok(ValueRange {
                    range: a1::cell_address(sheet, update.row, update.col)?,
                    values: vec![vec![update.value]],
                })
            })
            .collect::<SheetsResult<Vec<_>>>()?;

        let count = data.len();
        self.api
            .batch_update_values(data, ValueInputOption::UserEntered)
            .await?;

        info!("Updated {} cells in \"{}\"", count, sheet);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    pub async fn append_row(&self, sheet: &str, values: Vec<CellValue>) -> SheetsResult<()> {
        if values.is_empty() {
            return Err(SheetsError::Validation("Row values must not be empty".into()));
        }

        self.api
            .append_values(
                &a1::sheet_range(sheet, "A1"),
                vec![values],
                ValueInputOption::UserEntered,
            )
            .await
    }

    /// Insert a blank row at zero-based `row_index` and optionally fill it.
    ///
    /// If filling fails the blank row stays behind, reported as
    /// [`SheetsError::PartiallyApplied`].
    pub async fn insert_row(
        &self,
        sheet: &str,
        row_index: u32,
        values: Option<Vec<CellValue>>,
    ) -> SheetsResult<()> {
        let info = self.find_sheet(sheet).await?;
        if row_index > info.row_count {
            return Err(SheetsError::Validation(format!(
                "Row index {} is beyond the end of \"{}\" ({} rows)",
                row_index, sheet, info.row_count
            )));
        }

        self.api
            .batch_update(vec![SheetRequest::insert(DimensionRange::single(
                info.id,
                Dimension::Rows,
                row_index,
            ))])
            .await?;

        if let Some(values) = values.filter(|v| !v.is_empty()) {
            let target = a1::sheet_range(sheet, &format!("A{}", row_index + 1));
            if let Err(e) = self
                .api
                .update_values(&target, vec![values], ValueInputOption::UserEntered)
                .await
            {
                warn!("Inserted row {} in \"{}\" but could not fill it: {}", row_index, sheet, e);
                return Err(SheetsError::partially_applied("Row insert", e));
            }
        }

        info!("Inserted row at index {} in \"{}\"", row_index, sheet);
        Ok(())
    }

    /// Delete the row at zero-based `row_index`. The header row is protected.
    pub async fn delete_row(&self, sheet: &str, row_index: u32) -> SheetsResult<()> {
        if row_index == 0 {
            return Err(SheetsError::Validation("Cannot delete the header row".into()));
        }

        let info = self.find_sheet(sheet).await?;
        if self.get_sheet_data(sheet).await?.rows.is_empty() {
            return Err(SheetsError::Validation(format!(
                "\"{}\" has no rows besides the header",
                sheet
            )));
        }
        if row_index >= info.row_count {
            return Err(SheetsError::Validation(format!(
                "Row index {} is out of bounds for \"{}\" ({} rows)",
                row_index, sheet, info.row_count
            )));
        }

        self.api
            .batch_update(vec![SheetRequest::delete(DimensionRange::single(
                info.id,
                Dimension::Rows,
                row_index,
            ))])
            .await?;

        info!("Deleted row at index {} in \"{}\"", row_index, sheet);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Insert a column at zero-based `position` (default: after the last
    /// column) and write `header` into its first cell.
    pub async fn add_column(
        &self,
        sheet: &str,
        header: &str,
        position: Option<u32>,
    ) -> SheetsResult<()> {
        let info = self.find_sheet(sheet).await?;
        let position = position.unwrap_or(info.column_count);
        if position > info.column_count {
            return Err(SheetsError::Validation(format!(
                "Column position {} is beyond the end of \"{}\" ({} columns)",
                position, sheet, info.column_count
            )));
        }

        self.api
            .batch_update(vec![SheetRequest::insert(DimensionRange::single(
                info.id,
                Dimension::Columns,
                position,
            ))])
            .await?;

        if let Err(e) = self
            .update_cell(
                sheet,
                1,
                position as i64 + 1,
                CellValue::String(header.to_string()),
            )
            .await
        {
            warn!(
                "Inserted column {} in \"{}\" but could not write its header: {}",
                position, sheet, e
            );
            return Err(SheetsError::partially_applied("Column insert", e));
        }

        info!("Added column \"{}\" at index {} in \"{}\"", header, position, sheet);
        Ok(())
    }

    pub async fn delete_column(&self, sheet: &str, column_index: u32) -> SheetsResult<()> {
        let info = self.find_sheet(sheet).await?;
        if info.column_count <= 1 {
            return Err(SheetsError::Validation(format!(
                "Cannot delete the last column of \"{}\"",
                sheet
            )));
        }
        if column_index >= info.column_count {
            return Err(SheetsError::Validation(format!(
                "Column index {} is out of bounds for \"{}\" ({} columns)",
                column_index, sheet, info.column_count
            )));
        }

        self.api
            .batch_update(vec![SheetRequest::delete(DimensionRange::single(
                info.id,
                Dimension::Columns,
                column_index,
            ))])
            .await?;

        info!("Deleted column at index {} in \"{}\"", column_index, sheet);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sort & search
    // ------------------------------------------------------------------

    /// Sort `range` (e.g. `A2:D50`, optionally `Sheet1!`-prefixed) by the
    /// zero-based sheet column `sort_column_index`, which must lie inside it.
    pub async fn sort_range(
        &self,
        sheet: &str,
        range: &str,
        sort_column_index: u32,
        ascending: bool,
    ) -> SheetsResult<()> {
        let (prefix, bare) = split_sheet_prefix(range);
        if let Some(prefix) = prefix.filter(|p| p != sheet) {
            return Err(SheetsError::InvalidArgument(format!(
                "Range refers to sheet \"{}\" but the sort targets \"{}\"",
                prefix, sheet
            )));
        }

        let cells = CellRange::parse(bare)?;
        if !cells.contains_column(sort_column_index) {
            return Err(SheetsError::InvalidArgument(format!(
                "Sort column {} is outside the range {} (columns {}..{})",
                sort_column_index, bare, cells.start_column_index, cells.end_column_index
            )));
        }

        let info = self.find_sheet(sheet).await?;
        self.api
            .batch_update(vec![SheetRequest::sort(
                GridRange::new(info.id, cells),
                sort_column_index,
                ascending,
            )])
            .await?;

        info!(
            "Sorted {} in \"{}\" by column {} ({})",
            bare,
            sheet,
            sort_column_index,
            if ascending { "ascending" } else { "descending" }
        );
        Ok(())
    }

    pub async fn search(&self, sheet: &str, term: &str) -> SheetsResult<Vec<SearchHit>> {
        if term.trim().is_empty() {
            return Err(SheetsError::Validation("Search query must not be empty".into()));
        }

        self.get_sheet_data(sheet).await?.search(term)
    }

    async fn find_sheet(&self, title: &str) -> SheetsResult<SheetInfo> {
        self.api
            .sheets()
            .await?
            .into_iter()
            .find(|s| s.title == title)
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))
    }
}

/// Sheet titles are unique regardless of case.
fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn require_range(range: &str) -> SheetsResult<()> {
    if range.trim().is_empty() {
        return Err(SheetsError::Validation("Range parameter required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fake::{Call, FakeSheets};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service() -> SheetService<FakeSheets> {
        SheetService::new(
            FakeSheets::new()
                .with_sheet(1, "Sheet1", 100, 4)
                .with_sheet(2, "Archive", 10, 1),
        )
    }

    #[tokio::test]
    async fn test_create_sheet_returns_remote_id() {
        let service = service();

        let sheet = service.create_sheet("Q3").await.unwrap();

        assert_eq!(sheet.title, "Q3");
        assert_eq!(sheet.id, 3);
        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdate(vec![SheetRequest::add_sheet("Q3", 1000, 26)])]
        );
    }

    #[tokio::test]
    async fn test_create_sheet_rejects_existing_title() {
        let service = service();

        let err = service.create_sheet("archive").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_rename_sheet_rejects_title_of_other_sheet() {
        let service = service();

        assert!(service.rename_sheet(1, "Archive").await.is_err());
        assert!(service.api().mutations().is_empty());

        service.rename_sheet(1, "Main").await.unwrap();
        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdate(vec![SheetRequest::rename_sheet(1, "Main")])]
        );
    }

    #[tokio::test]
    async fn test_rename_unknown_sheet_is_not_found() {
        let err = service().rename_sheet(42, "Main").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_only_sheet_is_rejected() {
        let service = SheetService::new(FakeSheets::new().with_sheet(1, "Sheet1", 10, 2));

        let err = service.delete_sheet(1).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sheet() {
        let service = service();

        service.delete_sheet(2).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdate(vec![SheetRequest::DeleteSheet(DeleteSheet {
                sheet_id: 2
            })])]
        );
    }

    #[tokio::test]
    async fn test_get_sheet_data_reads_through_zz() {
        let service = SheetService::new(FakeSheets::new().with_values(
            "Sheet1!A1:ZZ",
            vec![vec![json!("Name")], vec![json!("Ada")]],
        ));

        let data = service.get_sheet_data("Sheet1").await.unwrap();

        assert_eq!(data.headers, vec!["Name"]);
        assert_eq!(data.rows, vec![vec![json!("Ada")]]);
    }

    #[tokio::test]
    async fn test_update_cell_translates_to_a1() {
        let service = service();

        service.update_cell("Sheet1", 10, 3, json!(42)).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![Call::UpdateValues {
                range: "Sheet1!C10".into(),
                values: vec![vec![json!(42)]],
                input: ValueInputOption::UserEntered,
            }]
        );
    }

    #[tokio::test]
    async fn test_update_cell_rejects_zero_column() {
        let service = service();

        let err = service.update_cell("Sheet1", 1, 0, json!("x")).await.unwrap_err();

        assert!(matches!(err, SheetsError::InvalidArgument(_)));
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_update_sends_one_request() {
        let service = service();
        let updates = vec![
            CellUpdate { row: 1, col: 1, value: json!("a") },
            CellUpdate { row: 2, col: 28, value: json!("b") },
        ];

        service.batch_update("Sheet1", updates).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdateValues {
                data: vec![
                    ValueRange { range: "Sheet1!A1".into(), values: vec![vec![json!("a")]] },
                    ValueRange { range: "Sheet1!AB2".into(), values: vec![vec![json!("b")]] },
                ],
                input: ValueInputOption::UserEntered,
            }]
        );
    }

    #[tokio::test]
    async fn test_batch_update_rejects_oversized_batch_without_remote_calls() {
        let service = service();
        let updates: Vec<CellUpdate> = (1..=1001)
            .map(|row| CellUpdate { row, col: 1, value: json!(row) })
            .collect();

        let err = service.batch_update("Sheet1", updates).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_update_accepts_exactly_the_limit() {
        let service = service();
        let updates: Vec<CellUpdate> = (1..=MAX_BATCH_UPDATES as i64)
            .map(|row| CellUpdate { row, col: 1, value: json!(row) })
            .collect();

        service.batch_update("Sheet1", updates).await.unwrap();

        let mutations = service.api().mutations();
        assert_eq!(mutations.len(), 1);
        match &mutations[0] {
            Call::BatchUpdateValues { data, .. } => {
                assert_eq!(data.len(), MAX_BATCH_UPDATES);
                assert_eq!(data[999].range, "Sheet1!A1000");
            }
            other => panic!("expected one values batch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_update_rejects_empty_and_bad_coordinates() {
        let service = service();

        assert!(service.batch_update("Sheet1", vec![]).await.is_err());
        assert!(
            service
                .batch_update("Sheet1", vec![CellUpdate { row: -1, col: 1, value: json!(1) }])
                .await
                .is_err()
        );
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_append_row_requires_values() {
        let service = service();

        assert!(service.append_row("Sheet1", vec![]).await.is_err());

        service.append_row("Sheet1", vec![json!("x")]).await.unwrap();
        assert_eq!(
            service.api().mutations(),
            vec![Call::AppendValues {
                range: "Sheet1!A1".into(),
                values: vec![vec![json!("x")]],
                input: ValueInputOption::UserEntered,
            }]
        );
    }

    #[tokio::test]
    async fn test_insert_row_inserts_then_fills() {
        let service = service();

        service
            .insert_row("Sheet1", 3, Some(vec![json!("a"), json!("b")]))
            .await
            .unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![
                Call::BatchUpdate(vec![SheetRequest::insert(DimensionRange::single(
                    1,
                    Dimension::Rows,
                    3
                ))]),
                Call::UpdateValues {
                    range: "Sheet1!A4".into(),
                    values: vec![vec![json!("a"), json!("b")]],
                    input: ValueInputOption::UserEntered,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_insert_row_fill_failure_is_partial() {
        let service = SheetService::new(
            FakeSheets::new()
                .with_sheet(1, "Sheet1", 100, 4)
                .failing_value_writes(),
        );

        let err = service
            .insert_row("Sheet1", 1, Some(vec![json!("a")]))
            .await
            .unwrap_err();

        assert!(err.state_changed());
        assert_eq!(err.kind(), ErrorKind::RemoteTransport);
    }

    #[tokio::test]
    async fn test_insert_row_beyond_grid_is_rejected() {
        let service = service();

        let err = service.insert_row("Sheet1", 101, None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());

        service.insert_row("Sheet1", 100, None).await.unwrap();
        assert_eq!(service.api().mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_header_row_is_rejected() {
        let service = service();

        let err = service.delete_row("Sheet1", 0).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().calls().is_empty());
    }

    fn service_with_rows() -> SheetService<FakeSheets> {
        SheetService::new(
            FakeSheets::new()
                .with_sheet(1, "Sheet1", 100, 4)
                .with_values(
                    "Sheet1!A1:ZZ",
                    vec![vec![json!("Name")], vec![json!("Ada")], vec![json!("Grace")]],
                ),
        )
    }

    #[tokio::test]
    async fn test_delete_row_needs_more_than_header() {
        let service = SheetService::new(
            FakeSheets::new()
                .with_sheet(1, "Sheet1", 1000, 26)
                .with_values("Sheet1!A1:ZZ", vec![vec![json!("Name")]]),
        );

        let err = service.delete_row("Sheet1", 1).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_row_beyond_grid_is_rejected() {
        let service = service_with_rows();

        let err = service.delete_row("Sheet1", 100).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_row_on_unknown_sheet_is_not_found() {
        let err = service().delete_row("Nope", 1).await.unwrap_err();
        assert!(matches!(err, SheetsError::SheetNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_row() {
        let service = service_with_rows();

        service.delete_row("Sheet1", 5).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdate(vec![SheetRequest::delete(DimensionRange::single(
                1,
                Dimension::Rows,
                5
            ))])]
        );
    }

    #[tokio::test]
    async fn test_add_column_defaults_to_end_and_writes_header() {
        let service = service();

        service.add_column("Sheet1", "Phone", None).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![
                Call::BatchUpdate(vec![SheetRequest::insert(DimensionRange::single(
                    1,
                    Dimension::Columns,
                    4
                ))]),
                Call::UpdateValues {
                    range: "Sheet1!E1".into(),
                    values: vec![vec![json!("Phone")]],
                    input: ValueInputOption::UserEntered,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_add_column_header_failure_is_partial() {
        let service = SheetService::new(
            FakeSheets::new()
                .with_sheet(1, "Sheet1", 100, 4)
                .failing_value_writes(),
        );

        let err = service.add_column("Sheet1", "Phone", Some(1)).await.unwrap_err();

        assert!(err.state_changed());
        assert_eq!(err.kind(), ErrorKind::RemoteTransport);
        assert_eq!(
            service.api().mutations()[0],
            Call::BatchUpdate(vec![SheetRequest::insert(DimensionRange::single(
                1,
                Dimension::Columns,
                1
            ))])
        );
    }

    #[tokio::test]
    async fn test_add_column_accepts_empty_header() {
        let service = service();

        service.add_column("Sheet1", "", Some(0)).await.unwrap();

        assert_eq!(service.api().mutations().len(), 2);
    }

    #[tokio::test]
    async fn test_add_column_beyond_end_is_rejected() {
        let service = service();

        let err = service.add_column("Sheet1", "Phone", Some(5)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_last_column_is_rejected() {
        let service = service();

        let err = service.delete_column("Archive", 0).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_column_out_of_bounds_is_rejected() {
        let service = service();

        assert!(service.delete_column("Sheet1", 4).await.is_err());
        service.delete_column("Sheet1", 3).await.unwrap();
        assert_eq!(service.api().mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_range_issues_range_scoped_sort() {
        let service = service();

        service.sort_range("Sheet1", "Sheet1!A2:C10", 1, false).await.unwrap();

        let expected = SheetRequest::sort(
            GridRange::new(1, CellRange::parse("A2:C10").unwrap()),
            1,
            false,
        );
        assert_eq!(service.api().mutations(), vec![Call::BatchUpdate(vec![expected])]);
    }

    #[tokio::test]
    async fn test_sort_column_outside_range_fails_before_remote_calls() {
        let service = service();

        let err = service.sort_range("Sheet1", "B1:C10", 0, true).await.unwrap_err();

        assert!(matches!(err, SheetsError::InvalidArgument(_)));
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_sort_rejects_bad_range_and_foreign_prefix() {
        let service = service();

        assert!(matches!(
            service.sort_range("Sheet1", "A1-C10", 0, true).await,
            Err(SheetsError::InvalidRange(_))
        ));
        assert!(matches!(
            service.sort_range("Sheet1", "Archive!A1:C10", 0, true).await,
            Err(SheetsError::InvalidArgument(_))
        ));
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_blank_term_without_fetching() {
        let service = service();

        assert!(service.search("Sheet1", " ").await.is_err());
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_fetches_and_scans() {
        let service = SheetService::new(FakeSheets::new().with_values(
            "Sheet1!A1:ZZ",
            vec![
                vec![json!("Name"), json!("Email")],
                vec![json!("John Doe"), json!("j@x.com")],
            ],
        ));

        let hits = service.search("Sheet1", "john").await.unwrap();

        assert_eq!(hits, vec![SearchHit { row: 2, col: 1, value: json!("John Doe") }]);
    }

    #[tokio::test]
    async fn test_update_range_requires_values() {
        let service = service();

        assert!(service.update_range("Sheet1!A1:B2", vec![]).await.is_err());
        assert!(service.update_range("", vec![vec![json!(1)]]).await.is_err());
        assert!(service.api().calls().is_empty());
    }
}
