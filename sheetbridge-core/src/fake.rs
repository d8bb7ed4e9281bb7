//! In-memory `SheetsApi` that records every call, for facade tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{BatchReply, SheetRequest, SheetsApi, ValueInputOption, ValueRange};
use crate::error::{SheetsError, SheetsResult};
use crate::sheet::{CellValue, SheetInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Sheets,
    BatchUpdate(Vec<SheetRequest>),
    GetValues(String),
    UpdateValues {
        range: String,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    },
    AppendValues {
        range: String,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    },
    BatchUpdateValues {
        data: Vec<ValueRange>,
        input: ValueInputOption,
    },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::Sheets | Call::GetValues(_))
    }
}

#[derive(Default)]
struct State {
    sheets: Vec<SheetInfo>,
    values: HashMap<String, Vec<Vec<CellValue>>>,
    calls: Vec<Call>,
    fail_value_writes: bool,
}

#[derive(Default)]
pub struct FakeSheets {
    state: Mutex<State>,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, id: i64, title: &str, row_count: u32, column_count: u32) -> Self {
        self.state.lock().unwrap().sheets.push(SheetInfo {
            id,
            title: title.to_string(),
            row_count,
            column_count,
        });
        self
    }

    /// Serve `values` for `values.get` on exactly this range.
    pub fn with_values(self, range: &str, values: Vec<Vec<CellValue>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .values
            .insert(range.to_string(), values);
        self
    }

    /// Make every `values.update` fail, to exercise partially applied operations.
    pub fn failing_value_writes(self) -> Self {
        self.state.lock().unwrap().fail_value_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl SheetsApi for FakeSheets {
    async fn sheets(&self) -> SheetsResult<Vec<SheetInfo>> {
        self.record(Call::Sheets);
        Ok(self.state.lock().unwrap().sheets.clone())
    }

    async fn batch_update(&self, requests: Vec<SheetRequest>) -> SheetsResult<Vec<BatchReply>> {
        self.record(Call::BatchUpdate(requests.clone()));

        let mut state = self.state.lock().unwrap();
        let mut replies = Vec::new();

        for request in requests {
            let mut reply = BatchReply::default();
            if let SheetRequest::AddSheet(add) = request {
                let id = state.sheets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
                let info = SheetInfo {
                    id,
                    title: add.properties.title,
                    row_count: add.properties.grid_properties.row_count,
                    column_count: add.properties.grid_properties.column_count,
                };
                state.sheets.push(info.clone());
                reply.added_sheet = Some(info);
            }
            replies.push(reply);
        }

        Ok(replies)
    }

    async fn get_values(&self, range: &str) -> SheetsResult<Vec<Vec<CellValue>>> {
        self.record(Call::GetValues(range.to_string()));
        Ok(self
            .state
            .lock()
            .unwrap()
            .values
            .get(range)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        self.record(Call::UpdateValues {
            range: range.to_string(),
            values,
            input,
        });

        if self.state.lock().unwrap().fail_value_writes {
            return Err(SheetsError::Transport("503 Service Unavailable".into()));
        }
        Ok(())
    }

    async fn append_values(
        &self,
        range: &str,
        values: Vec<Vec<CellValue>>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        self.record(Call::AppendValues {
            range: range.to_string(),
            values,
            input,
        });
        Ok(())
    }

    async fn batch_update_values(
        &self,
        data: Vec<ValueRange>,
        input: ValueInputOption,
    ) -> SheetsResult<()> {
        self.record(Call::BatchUpdateValues { data, input });
        Ok(())
    }
}
