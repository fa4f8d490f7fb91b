//! Error types for sheetsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=remote, 3=not_found, 4=validation, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output (`{success: false, message, error}`) for piped consumers

use thiserror::Error;

use crate::model::RowKey;
use crate::sync::SyncError;

/// Result type alias for sheetsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Remote (exit 2)
    RemoteUnavailable,
    RemoteRejected,

    // Not Found (exit 3)
    SheetNotFound,
    RecordNotFound,
    FileNotFound,

    // Validation (exit 4)
    InvalidArgument,
    RequiredField,
    DuplicateRecord,

    // Data shape (exit 5)
    HeaderMismatch,
    MalformedLocalData,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::RemoteUnavailable => "REMOTE_UNAVAILABLE",
            Self::RemoteRejected => "REMOTE_REJECTED",
            Self::SheetNotFound => "SHEET_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::DuplicateRecord => "DUPLICATE_RECORD",
            Self::HeaderMismatch => "HEADER_MISMATCH",
            Self::MalformedLocalData => "MALFORMED_LOCAL_DATA",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::RemoteUnavailable | Self::RemoteRejected => 2,
            Self::SheetNotFound | Self::RecordNotFound | Self::FileNotFound => 3,
            Self::InvalidArgument | Self::RequiredField | Self::DuplicateRecord => 4,
            Self::HeaderMismatch | Self::MalformedLocalData => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether re-running with corrected input can succeed.
    ///
    /// True for validation errors and transport failures. Nothing is
    /// retried automatically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument
                | Self::RequiredField
                | Self::DuplicateRecord
                | Self::RemoteUnavailable
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in sheetsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Entry already exists: category \"{}\" + key \"{}\"", .0.category, .0.key)]
    DuplicateRecord(RowKey),

    #[error("Missing required field: {0}")]
    RequiredField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Sync(err) => match err {
                SyncError::RemoteUnavailable(_) => ErrorCode::RemoteUnavailable,
                SyncError::RemoteRejected { .. } => ErrorCode::RemoteRejected,
                SyncError::SheetNotFound { .. } => ErrorCode::SheetNotFound,
                SyncError::RecordNotFound(_) => ErrorCode::RecordNotFound,
                SyncError::FileNotFound(_) => ErrorCode::FileNotFound,
                SyncError::HeaderMismatch { .. } => ErrorCode::HeaderMismatch,
                SyncError::MalformedLocalData { .. } => ErrorCode::MalformedLocalData,
                SyncError::RangeTooNarrow { .. } => ErrorCode::ConfigError,
                SyncError::Io(_) => ErrorCode::IoError,
                SyncError::Json(_) => ErrorCode::JsonError,
            },
            Self::DuplicateRecord(_) => ErrorCode::DuplicateRecord,
            Self::RequiredField(_) => ErrorCode::RequiredField,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Sync(SyncError::SheetNotFound { available, .. }) => {
                if available.is_empty() {
                    Some("The spreadsheet has no sheets visible to these credentials.".to_string())
                } else {
                    Some(format!(
                        "Sheet names are case-sensitive. Use --sheet-name with one of: {}",
                        available.join(", ")
                    ))
                }
            }

            Self::Sync(SyncError::HeaderMismatch { missing, expected, .. }) => Some(format!(
                "The first sheet row must contain a {missing} column labelled one of: {}. \
                 Add the label to the sheet or to `headers.{missing}` in the config file.",
                expected.join(", ")
            )),

            Self::Sync(SyncError::RemoteUnavailable(_)) => Some(
                "Check network access and the service-account key (`auth`), or set \
                 SHEETSYNC_ACCESS_TOKEN. The sheet must be shared with the service account."
                    .to_string(),
            ),

            Self::Sync(SyncError::FileNotFound(_)) => Some(
                "Run `sheetsync download` to create the local catalog, or pass --file.".to_string(),
            ),

            Self::Sync(SyncError::RecordNotFound(key)) => Some(format!(
                "No row with category \"{}\" and key \"{}\". Run `sheetsync download` to refresh the local view.",
                key.category, key.key
            )),

            Self::Sync(SyncError::RangeTooNarrow { required, .. }) => Some(format!(
                "Widen `range` in the config file to reach at least column {required}."
            )),

            Self::DuplicateRecord(_) => {
                Some("Use a different key, or edit the existing entry in the sheet.".to_string())
            }

            Self::Config(_) => Some(
                "Create sheetsync.json (sheetId, auth, langs) or pass --sheet-id / --langs."
                    .to_string(),
            ),

            Self::Sync(
                SyncError::RemoteRejected { .. }
                | SyncError::MalformedLocalData { .. }
                | SyncError::Io(_)
                | SyncError::Json(_),
            )
            | Self::RequiredField(_)
            | Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Carries the `{success, message}` envelope every command reports,
    /// plus the error code, retryability, exit code and optional hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "success": false,
            "message": self.to_string(),
            "error": {
                "code": code.as_str(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        if let Self::Sync(SyncError::RemoteRejected { reason: Some(reason), status, .. }) = self {
            obj["error"]["remote_status"] = serde_json::Value::String(reason.clone());
            obj["error"]["http_status"] = serde_json::Value::from(*status);
        }

        obj
    }
}
