//! The narrow `{id, name, email, role}` record schema and its row codec.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SheetsError, SheetsResult};
use crate::sheet::{CellValue, cell_text};

/// Number of cells a record occupies.
pub const RECORD_WIDTH: usize = 4;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const MAX_ROLE_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A record before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl Record {
    /// Read a row. Rows shorter than [`RECORD_WIDTH`] are not records.
    pub fn decode(row: &[CellValue]) -> Option<Self> {
        if row.len() < RECORD_WIDTH {
            return None;
        }

        Some(Record {
            id: cell_text(&row[0]),
            name: cell_text(&row[1]),
            email: cell_text(&row[2]),
            role: cell_text(&row[3]),
        })
    }

    pub fn encode(&self) -> Vec<CellValue> {
        [&self.id, &self.name, &self.email, &self.role]
            .into_iter()
            .map(|field| CellValue::String(field.clone()))
            .collect()
    }

    pub fn from_draft(id: impl Into<String>, draft: RecordDraft) -> Self {
        Record {
            id: id.into(),
            name: draft.name,
            email: draft.email,
            role: draft.role,
        }
    }
}

impl RecordDraft {
    /// Check field lengths and email shape, reporting every problem at once.
    pub fn validate(&self) -> SheetsResult<()> {
        let mut problems = Vec::new();

        check_length("name", &self.name, MAX_NAME_LEN, "Name is required", &mut problems);
        check_length("role", &self.role, MAX_ROLE_LEN, "Role is required", &mut problems);

        if !is_email(&self.email) {
            problems.push("email: Invalid email format".to_string());
        } else if self.email.chars().count() > MAX_EMAIL_LEN {
            problems.push(format!("email: must be at most {} characters", MAX_EMAIL_LEN));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SheetsError::InvalidRecord(problems))
        }
    }
}

/// Record ids are UUIDs.
pub fn validate_id(id: &str) -> SheetsResult<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| SheetsError::InvalidRecord(vec!["id: Invalid ID format".to_string()]))
}

fn check_length(field: &str, value: &str, max: usize, missing: &str, problems: &mut Vec<String>) {
    let len = value.chars().count();
    if len == 0 {
        problems.push(format!("{}: {}", field, missing));
    } else if len > max {
        problems.push(format!("{}: must be at most {} characters", field, max));
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.split('.').count() > 1
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn draft() -> RecordDraft {
        RecordDraft {
            name: "n".into(),
            email: "e@x.com".into(),
            role: "r".into(),
        }
    }

    #[test]
    fn test_encode_then_decode_is_identity() {
        let record = Record::from_draft("x", draft());

        assert_eq!(Record::decode(&record.encode()), Some(record));
    }

    #[test]
    fn test_short_rows_are_absent() {
        assert_eq!(Record::decode(&[json!("x"), json!("n")]), None);
        assert_eq!(Record::decode(&[]), None);
    }

    #[test]
    fn test_decode_ignores_extra_cells_and_reads_nulls_as_empty() {
        let row = vec![json!("x"), json!(null), json!("e@x.com"), json!("r"), json!("extra")];

        let record = Record::decode(&row).unwrap();

        assert_eq!(record.name, "");
        assert_eq!(record.role, "r");
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_invalid_draft_reports_every_field() {
        let bad = RecordDraft {
            name: String::new(),
            email: "not-an-email".into(),
            role: "r".repeat(51),
        };

        let Err(SheetsError::InvalidRecord(problems)) = bad.validate() else {
            panic!("expected InvalidRecord");
        };

        assert_eq!(
            problems,
            vec![
                "name: Name is required",
                "role: must be at most 50 characters",
                "email: Invalid email format",
            ]
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a.b@example.co.uk"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("a@@example.com"));
        assert!(!is_email("a b@example.com"));
        assert!(!is_email("a@example..com"));
    }

    #[test]
    fn test_validate_id_requires_uuid() {
        assert!(validate_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
        assert!(validate_id("123").is_err());
    }
}
