//! `{id, name, email, role}` records kept one per row on a fixed sheet.
//!
//! Rows are addressed by scanning a fresh snapshot for the record id, then
//! writing to the row number found. Another writer inserting or deleting rows
//! between the scan and the write makes that write land on the wrong row;
//! the store offers no protection against this.

use log::{info, warn};
use uuid::Uuid;

use crate::a1;
use crate::api::{Dimension, DimensionRange, SheetRequest, SheetsApi, ValueInputOption};
use crate::error::{SheetsError, SheetsResult};
use crate::locate::{RowLocation, locate};
use crate::record::{Record, RecordDraft, validate_id};
use crate::sheet::CellValue;

/// Last column of the record block.
const LAST_RECORD_COLUMN: &str = "Z";

pub struct RecordStore<'a, A> {
    api: &'a A,
    sheet: &'a str,
    data_start_row: u32,
}

impl<'a, A: SheetsApi> RecordStore<'a, A> {
    pub fn new(api: &'a A, sheet: &'a str, data_start_row: u32) -> Self {
        RecordStore {
            api,
            sheet,
            data_start_row,
        }
    }

    fn data_range(&self) -> String {
        a1::sheet_range(
            self.sheet,
            &format!("A{}:{}", self.data_start_row, LAST_RECORD_COLUMN),
        )
    }

    fn row_range(&self, row: u32) -> String {
        a1::sheet_range(self.sheet, &format!("A{}:{}{}", row, LAST_RECORD_COLUMN, row))
    }

    async fn snapshot(&self) -> SheetsResult<Vec<Vec<CellValue>>> {
        self.api.get_values(&self.data_range()).await
    }

    async fn find(&self, id: &str) -> SheetsResult<RowLocation> {
        let snapshot = self.snapshot().await?;
        locate(&snapshot, id, self.data_start_row)
            .ok_or_else(|| SheetsError::RecordNotFound(id.to_string()))
    }

    /// Every row that decodes as a record. Short rows are skipped.
    pub async fn list(&self) -> SheetsResult<Vec<Record>> {
        let rows = self.snapshot().await?;
        let records: Vec<Record> = rows.iter().filter_map(|row| Record::decode(row)).collect();

        if records.len() < rows.len() {
            warn!(
                "Skipped {} malformed rows in \"{}\"",
                rows.len() - records.len(),
                self.sheet
            );
        }

        Ok(records)
    }

    pub async fn create(&self, draft: RecordDraft) -> SheetsResult<Record> {
        draft.validate()?;

        let record = Record::from_draft(Uuid::new_v4().to_string(), draft);
        self.api
            .append_values(&self.data_range(), vec![record.encode()], ValueInputOption::Raw)
            .await?;

        info!("Created record {}", record.id);
        Ok(record)
    }

    /// Validate every draft first, then append them all in one request.
    pub async fn bulk_create(&self, drafts: Vec<RecordDraft>) -> SheetsResult<Vec<Record>> {
        if drafts.is_empty() {
            return Err(SheetsError::Validation("At least one record is required".into()));
        }

        let problems: Vec<String> = drafts
            .iter()
            .enumerate()
            .filter_map(|(i, draft)| match draft.validate() {
                Err(SheetsError::InvalidRecord(details)) => Some(
                    details
                        .into_iter()
                        .map(move |d| format!("records[{}].{}", i, d))
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            })
            .flatten()
            .collect();
        if !problems.is_empty() {
            return Err(SheetsError::InvalidRecord(problems));
        }

        let records: Vec<Record> = drafts
            .into_iter()
            .map(|draft| Record::from_draft(Uuid::new_v4().to_string(), draft))
            .collect();

        self.api
            .append_values(
                &self.data_range(),
                records.iter().map(Record::encode).collect(),
                ValueInputOption::Raw,
            )
            .await?;

        info!("Created {} records", records.len());
        Ok(records)
    }

    pub async fn update(&self, id: &str, draft: RecordDraft) -> SheetsResult<Record> {
        validate_id(id)?;
        draft.validate()?;

        let location = self.find(id).await?;
        let record = Record::from_draft(id, draft);

        self.api
            .update_values(
                &self.row_range(location.sheet_row_number),
                vec![record.encode()],
                ValueInputOption::Raw,
            )
            .await?;

        info!("Updated record {} (row {})", id, location.sheet_row_number);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> SheetsResult<()> {
        validate_id(id)?;

        let location = self.find(id).await?;
        let sheet_id = self
            .api
            .sheets()
            .await?
            .into_iter()
            .find(|s| s.title == self.sheet)
            .map(|s| s.id)
            .ok_or_else(|| SheetsError::SheetNotFound(self.sheet.to_string()))?;

        self.api
            .batch_update(vec![SheetRequest::delete(DimensionRange::single(
                sheet_id,
                Dimension::Rows,
                location.sheet_row_number - 1,
            ))])
            .await?;

        info!("Deleted record {} (row {})", id, location.sheet_row_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fake::{Call, FakeSheets};
    use crate::service::SheetService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ALICE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    const BOB: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn draft(name: &str) -> RecordDraft {
        RecordDraft {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "member".into(),
        }
    }

    fn service() -> SheetService<FakeSheets> {
        SheetService::new(
            FakeSheets::new()
                .with_sheet(5, "People", 100, 4)
                .with_values(
                    "People!A2:Z",
                    vec![
                        vec![json!(ALICE), json!("Alice"), json!("alice@example.com"), json!("admin")],
                        vec![json!("broken")],
                        vec![json!(BOB), json!("Bob"), json!("bob@example.com"), json!("member")],
                    ],
                ),
        )
        .with_record_sheet("People", 2)
    }

    #[tokio::test]
    async fn test_list_skips_short_rows() {
        let records = service().records().list().await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_create_assigns_uuid_and_appends_raw() {
        let service = service();

        let record = service.records().create(draft("Carol")).await.unwrap();

        assert!(validate_id(&record.id).is_ok());
        assert_eq!(
            service.api().mutations(),
            vec![Call::AppendValues {
                range: "People!A2:Z".into(),
                values: vec![record.encode()],
                input: ValueInputOption::Raw,
            }]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let service = service();
        let mut bad = draft("Carol");
        bad.email = "nope".into();

        let err = service.records().create(bad).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_create_reports_indexed_problems() {
        let service = service();
        let mut bad = draft("Dan");
        bad.role = String::new();

        let err = service
            .records()
            .bulk_create(vec![draft("Carol"), bad])
            .await
            .unwrap_err();

        assert_eq!(err.details().unwrap(), ["records[1].role: Role is required"]);
        assert!(service.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_create_appends_once() {
        let service = service();

        let records = service
            .records()
            .bulk_create(vec![draft("Carol"), draft("Dan")])
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(service.api().mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_update_overwrites_located_row() {
        let service = service();

        service.records().update(BOB, draft("Robert")).await.unwrap();

        let Call::UpdateValues { range, values, .. } = &service.api().mutations()[0] else {
            panic!("expected a values update");
        };
        assert_eq!(range, "People!A4:Z4");
        assert_eq!(values[0][0], json!(BOB));
        assert_eq!(values[0][1], json!("Robert"));
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let service = service();

        let err = service
            .records()
            .update("2c5ea4c0-4067-11e9-8bad-9b1deb4d3b7d", draft("X"))
            .await
            .unwrap_err();

        assert!(matches!(err, SheetsError::RecordNotFound(_)));
        assert!(service.api().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_physical_row() {
        let service = service();

        service.records().delete(ALICE).await.unwrap();

        assert_eq!(
            service.api().mutations(),
            vec![Call::BatchUpdate(vec![SheetRequest::delete(DimensionRange::single(
                5,
                Dimension::Rows,
                1
            ))])]
        );
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_id() {
        let service = service();

        let err = service.records().delete("broken").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.api().calls().is_empty());
    }
}
