//! Sync types shared by the diff engine, the translator and the orchestrators.
//!
//! This module defines the mutation operations produced by a diff, the
//! statistics returned by uploads and downloads, and the sync error taxonomy.

use serde::Serialize;

use crate::model::RowKey;

/// Full logical content of a spreadsheet row.
///
/// `values` are in configured language order. Column placement is decided by
/// the translator from the sheet header, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowValues {
    /// Category cell.
    pub category: String,
    /// Key cell.
    pub key: String,
    /// One value per configured language, in configured order.
    pub values: Vec<String>,
}

impl RowValues {
    /// Composite identity of the row.
    #[must_use]
    pub fn row_key(&self) -> RowKey {
        RowKey::new(self.category.clone(), self.key.clone())
    }

    /// Cells in canonical order: category, key, then languages.
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.values.len() + 2);
        cells.push(self.category.clone());
        cells.push(self.key.clone());
        cells.extend(self.values.iter().cloned());
        cells
    }
}

/// One mutation against the remote sheet.
///
/// Row offsets are 0-based data-row offsets (the header row is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationOp {
    /// Add a row at the end of the sheet.
    Append(RowValues),
    /// Rewrite an existing row in full.
    Update {
        /// Data-row offset of the row being rewritten.
        row: usize,
        /// New row content.
        #[serde(flatten)]
        values: RowValues,
    },
    /// Remove an existing row.
    Delete {
        /// Data-row offset of the row being removed.
        row: usize,
        /// Identity of the row, kept for reporting.
        #[serde(flatten)]
        key: RowKey,
    },
}

impl MutationOp {
    /// Short verb used in logs and plan output.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// Identity of the affected row.
    #[must_use]
    pub fn row_key(&self) -> RowKey {
        match self {
            Self::Append(values) | Self::Update { values, .. } => values.row_key(),
            Self::Delete { key, .. } => key.clone(),
        }
    }
}

/// Statistics for an upload.
#[derive(Debug, Default, Clone, Serialize)]
pub struct UploadStats {
    /// Rows appended.
    pub appended: usize,
    /// Rows rewritten.
    pub updated: usize,
    /// Rows deleted.
    pub deleted: usize,
    /// Whether the header row was written or extended.
    pub header_written: bool,
    /// Number of requests in the batch (0 when nothing was sent).
    pub requests: usize,
    /// True when the plan was computed but not applied.
    pub dry_run: bool,
}

impl UploadStats {
    /// Total number of row mutations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.appended + self.updated + self.deleted
    }

    /// Returns true if local and remote were already in sync.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0 && !self.header_written
    }

    /// Tally a list of ops.
    #[must_use]
    pub fn from_ops(ops: &[MutationOp]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            match op {
                MutationOp::Append(_) => stats.appended += 1,
                MutationOp::Update { .. } => stats.updated += 1,
                MutationOp::Delete { .. } => stats.deleted += 1,
            }
        }
        stats
    }
}

/// Information about a written locale file.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleFileInfo {
    /// Language tag.
    pub lang: String,
    /// Path the file was written to.
    pub path: String,
    /// Number of entries in the file.
    pub entries: usize,
    /// Whether the content differs from what was on disk before.
    pub changed: bool,
}

/// Statistics for a download.
#[derive(Debug, Default, Clone, Serialize)]
pub struct DownloadStats {
    /// Records written to the consolidated catalog.
    pub records: usize,
    /// Sheet rows dropped because their key was empty.
    pub skipped: usize,
    /// Whether the consolidated catalog content changed.
    pub catalog_changed: bool,
    /// Locale files emitted.
    pub locale_files: Vec<LocaleFileInfo>,
}

impl DownloadStats {
    /// Returns true if the sheet had no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records == 0 && self.locale_files.is_empty()
    }
}

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The spreadsheet service could not be reached or authentication failed.
    #[error("Spreadsheet service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The configured sheet name is not present in the spreadsheet.
    #[error("Sheet not found: \"{name}\" (available: {})", available.join(", "))]
    SheetNotFound {
        /// Sheet name that was looked up.
        name: String,
        /// Sheet names present in the spreadsheet.
        available: Vec<String>,
    },

    /// The header row lacks a category or key column.
    #[error("Sheet \"{sheet}\" header has no {missing} column (header: [{}])", header.join(", "))]
    HeaderMismatch {
        /// Sheet name.
        sheet: String,
        /// Which role could not be resolved ("category" or "key").
        missing: &'static str,
        /// Labels accepted for the missing role.
        expected: Vec<String>,
        /// Header row as read.
        header: Vec<String>,
    },

    /// The local catalog file is not a JSON array of objects.
    #[error("Malformed local data in {path}: {message}")]
    MalformedLocalData {
        /// File path.
        path: String,
        /// What was wrong.
        message: String,
    },

    /// The service rejected a request.
    #[error("Spreadsheet service rejected the request ({status}): {message}")]
    RemoteRejected {
        /// HTTP status code.
        status: u16,
        /// Service-provided message, or the raw body when unstructured.
        message: String,
        /// Service status string (e.g. `INVALID_ARGUMENT`) when present.
        reason: Option<String>,
    },

    /// Writing the header would place a column outside the configured range.
    #[error("Range {range} covers {limit} columns but the header needs {required}")]
    RangeTooNarrow {
        /// Configured range.
        range: String,
        /// Columns the range covers.
        limit: usize,
        /// Columns the repaired header occupies.
        required: usize,
    },

    /// A row targeted by identity does not exist in the sheet.
    #[error("Row not found in sheet: {0}")]
    RecordNotFound(RowKey),

    /// Local catalog file not found.
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, key: &str, values: &[&str]) -> RowValues {
        RowValues {
            category: category.to_string(),
            key: key.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    #[test]
    fn test_row_values_cells() {
        assert_eq!(row("ui", "ok", &["OK", "D'accord"]).cells(), vec!["ui", "ok", "OK", "D'accord"]);
    }

    #[test]
    fn test_upload_stats_from_ops() {
        let ops = vec![
            MutationOp::Append(row("ui", "a", &[])),
            MutationOp::Update { row: 1, values: row("ui", "b", &[]) },
            MutationOp::Delete { row: 4, key: RowKey::new("ui", "c") },
            MutationOp::Delete { row: 2, key: RowKey::new("ui", "d") },
        ];
        let stats = UploadStats::from_ops(&ops);
        assert_eq!((stats.appended, stats.updated, stats.deleted), (1, 1, 2));
        assert_eq!(stats.total(), 4);
        assert!(!stats.is_empty());
        assert!(UploadStats::default().is_empty());
    }

    #[test]
    fn test_mutation_op_serializes_tagged() {
        let op = MutationOp::Update { row: 0, values: row("ui", "ok", &["OK"]) };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "update");
        assert_eq!(json["row"], 0);
        assert_eq!(json["key"], "ok");
    }

    #[test]
    fn test_sheet_not_found_lists_available() {
        let err = SyncError::SheetNotFound {
            name: "Translations".into(),
            available: vec!["Sheet1".into(), "Old".into()],
        };
        assert_eq!(err.to_string(), "Sheet not found: \"Translations\" (available: Sheet1, Old)");
    }
}
