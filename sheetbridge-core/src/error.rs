//! Error types for sheetbridge operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification callers use to decide how to react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input violated a precondition. Fix the input, never retry.
    Validation,
    /// The referenced sheet, record or remote document does not exist.
    NotFound,
    /// Authentication or permission failure talking to the remote store.
    RemoteAccess,
    /// The remote store throttled the request. Safe to retry with backoff.
    RemoteRateLimit,
    /// Any other network or service failure.
    RemoteTransport,
    /// Local configuration is missing or malformed.
    Config,
}

/// Errors that can occur in sheetbridge operations.
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("{0}")]
    Validation(String),

    #[error("Validation failed: {}", .0.join(", "))]
    InvalidRecord(Vec<String>),

    #[error("Sheet \"{0}\" not found")]
    SheetNotFound(String),

    #[error("Record with ID {0} not found")]
    RecordNotFound(String),

    #[error("Remote resource not found: {0}")]
    RemoteNotFound(String),

    #[error("Access to the spreadsheet was denied: {0}")]
    RemoteAccess(String),

    #[error("Rate limited by the spreadsheet service: {0}")]
    RateLimited(String),

    #[error("Spreadsheet service error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The first remote step of a two-step operation was applied, the second
    /// was not. The sheet was modified.
    #[error("{completed} was applied but the follow-up write failed: {source}")]
    PartiallyApplied {
        completed: String,
        #[source]
        source: Box<SheetsError>,
    },
}

impl SheetsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetsError::InvalidArgument(_)
            | SheetsError::InvalidRange(_)
            | SheetsError::Validation(_)
            | SheetsError::InvalidRecord(_) => ErrorKind::Validation,
            SheetsError::SheetNotFound(_)
            | SheetsError::RecordNotFound(_)
            | SheetsError::RemoteNotFound(_) => ErrorKind::NotFound,
            SheetsError::RemoteAccess(_) => ErrorKind::RemoteAccess,
            SheetsError::RateLimited(_) => ErrorKind::RemoteRateLimit,
            SheetsError::Transport(_) | SheetsError::Serialization(_) => {
                ErrorKind::RemoteTransport
            }
            SheetsError::Config(_) => ErrorKind::Config,
            SheetsError::PartiallyApplied { source, .. } => source.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RemoteRateLimit
    }

    /// Whether the remote document was modified before the failure.
    pub fn state_changed(&self) -> bool {
        matches!(self, SheetsError::PartiallyApplied { .. })
    }

    /// Field-level problems, when the error carries them.
    pub fn details(&self) -> Option<&[String]> {
        match self {
            SheetsError::InvalidRecord(details) => Some(details),
            _ => None,
        }
    }

    pub(crate) fn partially_applied(completed: impl Into<String>, source: SheetsError) -> Self {
        SheetsError::PartiallyApplied {
            completed: completed.into(),
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for SheetsError {
    fn from(err: serde_json::Error) -> Self {
        SheetsError::Serialization(err.to_string())
    }
}

/// Result type alias for sheetbridge operations.
pub type SheetsResult<T> = Result<T, SheetsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_reports_inner_kind_and_state_change() {
        let err = SheetsError::partially_applied(
            "Row insert",
            SheetsError::RateLimited("quota exceeded".into()),
        );

        assert_eq!(err.kind(), ErrorKind::RemoteRateLimit);
        assert!(err.state_changed());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_errors_are_not_retryable() {
        let err = SheetsError::InvalidRange("A1-C10".into());

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());
        assert!(!err.state_changed());
    }

    #[test]
    fn test_invalid_record_exposes_details() {
        let err = SheetsError::InvalidRecord(vec!["email: Invalid email format".into()]);

        assert_eq!(err.details().map(|d| d.len()), Some(1));
        assert_eq!(err.to_string(), "Validation failed: email: Invalid email format");
    }
}
