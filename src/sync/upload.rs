//! Upload: push the local catalog to the sheet.
//!
//! Pipeline: read local → read remote → diff → translate → one batch update.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::SheetConfig;
use crate::model::{Catalog, RowKey};
use crate::sheets::SheetsApi;
use crate::sync::diff::diff;
use crate::sync::grid::read_remote;
use crate::sync::local::read_catalog;
use crate::sync::translate::{delete_request, resolve_sheet_id, sheet_row_number, translate, RowLayout};
use crate::sync::types::{MutationOp, SyncError, SyncResult, UploadStats};

/// Outcome of an upload or a plan.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub stats: UploadStats,
    pub ops: Vec<MutationOp>,
}

/// Pushes local changes to one sheet.
pub struct Uploader<'a, S: SheetsApi> {
    sheets: &'a S,
    config: &'a SheetConfig,
}

impl<'a, S: SheetsApi> Uploader<'a, S> {
    /// Create a new uploader.
    pub const fn new(sheets: &'a S, config: &'a SheetConfig) -> Self {
        Self { sheets, config }
    }

    /// Compute the ops an upload would apply, without applying them.
    ///
    /// # Errors
    ///
    /// Same as [`Uploader::upload`].
    pub async fn plan(&self, path: &Path) -> SyncResult<UploadReport> {
        self.upload(path, true).await
    }

    /// Upload the catalog file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the local file cannot be read, the sheet cannot be
    /// read, or the service rejects the batch.
    pub async fn upload(&self, path: &Path, dry_run: bool) -> SyncResult<UploadReport> {
        let local = read_catalog(path)?;
        info!(path = %path.display(), records = local.len(), "read local catalog");
        self.upload_catalog(&local, dry_run).await
    }

    /// Upload an in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be read or the service rejects
    /// the batch.
    pub async fn upload_catalog(&self, local: &Catalog, dry_run: bool) -> SyncResult<UploadReport> {
        let config = self.config;
        let remote = read_remote(self.sheets, config).await?;
        info!(
            sheet = %config.sheet_name,
            rows = remote.rows().len(),
            skipped = remote.skipped(),
            "read remote sheet"
        );

        let ops = diff(local, &remote, &config.langs);
        let layout = RowLayout::new(&remote, &config.headers, &config.langs);

        let mut stats = UploadStats::from_ops(&ops);
        stats.dry_run = dry_run;

        if ops.is_empty() {
            info!("already synchronized");
            return Ok(UploadReport { stats, ops });
        }
        stats.header_written = layout.header_changed();
        if layout.header_changed() {
            check_range(config, layout.header().len())?;
        }

        for op in &ops {
            let key = op.row_key();
            match op {
                MutationOp::Append(_) => info!(op = op.verb(), %key),
                MutationOp::Update { row, .. } | MutationOp::Delete { row, .. } => {
                    info!(op = op.verb(), %key, row = sheet_row_number(*row));
                }
            }
        }

        if dry_run {
            return Ok(UploadReport { stats, ops });
        }

        let properties = self.sheets.get_sheet_properties().await?;
        let sheet_id = resolve_sheet_id(&properties, &config.sheet_name)?;
        let requests = translate(&ops, &layout, &remote, sheet_id);

        self.sheets.batch_update(&requests).await?;
        stats.requests = requests.len();

        info!(
            appended = stats.appended,
            updated = stats.updated,
            deleted = stats.deleted,
            requests = stats.requests,
            "upload complete"
        );

        Ok(UploadReport { stats, ops })
    }

    /// Delete one row from the sheet by identity.
    ///
    /// When the sheet holds the identity more than once, the first row goes.
    /// Returns the data-row offset that was removed.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RecordNotFound` if no row carries the identity.
    pub async fn delete_remote(&self, key: &RowKey) -> SyncResult<usize> {
        let config = self.config;
        let remote = read_remote(self.sheets, config).await?;
        let offset = remote
            .find(key)
            .map(|row| row.offset)
            .ok_or_else(|| SyncError::RecordNotFound(key.clone()))?;

        let properties = self.sheets.get_sheet_properties().await?;
        let sheet_id = resolve_sheet_id(&properties, &config.sheet_name)?;
        self.sheets
            .batch_update(&[delete_request(sheet_id, offset)])
            .await?;

        info!(op = "delete", %key, row = sheet_row_number(offset), "deleted remote row");
        Ok(offset)
    }
}

/// Columns written past the configured range would never be read back.
fn check_range(config: &SheetConfig, required: usize) -> SyncResult<()> {
    match config.column_limit() {
        Some(limit) if required > limit => Err(SyncError::RangeTooNarrow {
            range: config.range.clone(),
            limit,
            required,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TranslationRecord;
    use crate::sheets::memory::MemorySheets;
    use crate::sheets::Request;
    use crate::sync::local::write_catalog;
    use tempfile::TempDir;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn config(langs: &[&str]) -> SheetConfig {
        SheetConfig::new("sheet123", strings(langs))
    }

    #[tokio::test]
    async fn test_upload_appends_to_empty_sheet_with_header() {
        let sheets = MemorySheets::new("Translations", &[]);
        let config = config(&["en", "fr"]);
        let local: Catalog = [TranslationRecord::new("ui", "ok")
            .with_value("en", "OK")
            .with_value("fr", "D'accord")]
        .into_iter()
        .collect();

        let report = Uploader::new(&sheets, &config)
            .upload_catalog(&local, false)
            .await
            .unwrap();

        assert_eq!(report.stats.appended, 1);
        assert!(report.stats.header_written);
        assert_eq!(
            sheets.rows(),
            vec![strings(&["分類", "Key", "en", "fr"]), strings(&["ui", "ok", "OK", "D'accord"])]
        );
    }

    #[tokio::test]
    async fn test_second_upload_is_a_no_op() {
        let sheets = MemorySheets::new(
            "Translations",
            &[&["cate", "key", "en"], &["ui", "old", "Old"], &["ui", "ok", "Yes"]],
        );
        let config = config(&["en", "fr"]);
        let local: Catalog = [
            TranslationRecord::new("ui", "ok").with_value("en", "OK").with_value("fr", "D'accord"),
            TranslationRecord::new("ui", "new").with_value("en", "New"),
        ]
        .into_iter()
        .collect();
        let uploader = Uploader::new(&sheets, &config);

        let first = uploader.upload_catalog(&local, false).await.unwrap();
        assert_eq!((first.stats.appended, first.stats.updated, first.stats.deleted), (1, 1, 1));
        assert_eq!(
            sheets.rows(),
            vec![
                strings(&["cate", "key", "en", "fr"]),
                strings(&["ui", "ok", "OK", "D'accord"]),
                strings(&["ui", "new", "New"]),
            ]
        );

        let second = uploader.upload_catalog(&local, false).await.unwrap();
        assert!(second.stats.is_empty());
        assert!(second.ops.is_empty());
        assert_eq!(sheets.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_header_repair_keeps_cells_past_the_header() {
        let sheets = MemorySheets::new(
            "Translations",
            &[
                &["cate", "key", "en"],
                &["ui", "ok", "Yes", "reviewer note"],
                &["ui", "no", "No", "keep"],
            ],
        );
        let config = config(&["en", "fr"]);
        let local: Catalog = [
            TranslationRecord::new("ui", "ok").with_value("en", "OK"),
            TranslationRecord::new("ui", "no").with_value("en", "No"),
        ]
        .into_iter()
        .collect();
        let uploader = Uploader::new(&sheets, &config);

        let first = uploader.upload_catalog(&local, false).await.unwrap();
        assert_eq!(first.stats.updated, 1);
        assert_eq!(
            sheets.rows(),
            vec![
                strings(&["cate", "key", "en", "", "fr"]),
                strings(&["ui", "ok", "OK", "reviewer note"]),
                strings(&["ui", "no", "No", "keep"]),
            ]
        );

        let second = uploader.upload_catalog(&local, false).await.unwrap();
        assert!(second.ops.is_empty());
        assert_eq!(sheets.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_header_repair_past_range_is_refused() {
        let sheets = MemorySheets::new("Translations", &[&["cate", "key", "en"], &["ui", "ok", "Yes"]]);
        let mut config = config(&["en", "fr"]);
        config.range = "A1:C".into();
        let local: Catalog = [TranslationRecord::new("ui", "ok").with_value("en", "OK")]
            .into_iter()
            .collect();

        let err = Uploader::new(&sheets, &config)
            .upload_catalog(&local, false)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::RangeTooNarrow { limit: 3, required: 4, .. }));
        assert!(sheets.batches().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let sheets = MemorySheets::new("Translations", &[&["cate", "key", "en"], &["ui", "ok", "Yes"]]);
        let config = config(&["en"]);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        let local: Catalog = [TranslationRecord::new("ui", "ok").with_value("en", "OK")]
            .into_iter()
            .collect();
        write_catalog(&path, &local, &config.langs).unwrap();

        let report = Uploader::new(&sheets, &config).plan(&path).await.unwrap();

        assert!(report.stats.dry_run);
        assert_eq!(report.stats.updated, 1);
        assert_eq!(report.stats.requests, 0);
        assert!(sheets.batches().is_empty());
    }

    #[tokio::test]
    async fn test_many_deletes_in_one_batch() {
        let sheets = MemorySheets::new(
            "Translations",
            &[
                &["cate", "key", "en"],
                &["ui", "k0", "0"],
                &["ui", "k1", "1"],
                &["ui", "k2", "2"],
                &["ui", "k3", "3"],
                &["ui", "k4", "4"],
            ],
        );
        let config = config(&["en"]);
        let local: Catalog = [
            TranslationRecord::new("ui", "k1").with_value("en", "1"),
            TranslationRecord::new("ui", "k3").with_value("en", "3"),
        ]
        .into_iter()
        .collect();

        let report = Uploader::new(&sheets, &config)
            .upload_catalog(&local, false)
            .await
            .unwrap();

        assert_eq!(report.stats.deleted, 3);
        assert_eq!(report.stats.requests, 3);
        assert!(sheets.batches()[0]
            .iter()
            .all(|r| matches!(r, Request::DeleteDimension(_))));
        assert_eq!(
            sheets.rows(),
            vec![strings(&["cate", "key", "en"]), strings(&["ui", "k1", "1"]), strings(&["ui", "k3", "3"])]
        );
    }

    #[tokio::test]
    async fn test_header_mismatch_aborts_before_writing() {
        let sheets = MemorySheets::new("Translations", &[&["Type", "Name", "en"], &["ui", "ok", "OK"]]);
        let config = config(&["en"]);

        let err = Uploader::new(&sheets, &config)
            .upload_catalog(&Catalog::new(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::HeaderMismatch { missing: "category", .. }));
        assert!(sheets.batches().is_empty());
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let sheets = MemorySheets::new("Translations", &[]);
        let config = config(&["en"]);

        let err = Uploader::new(&sheets, &config)
            .upload(Path::new("/nonexistent/entire.json"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_remote() {
        let sheets = MemorySheets::new(
            "Translations",
            &[&["cate", "key", "en"], &["ui", "ok", "OK"], &["ui", "cancel", "Cancel"]],
        );
        let config = config(&["en"]);
        let uploader = Uploader::new(&sheets, &config);

        assert_eq!(uploader.delete_remote(&RowKey::new("ui", "ok")).await.unwrap(), 0);
        assert_eq!(
            sheets.rows(),
            vec![strings(&["cate", "key", "en"]), strings(&["ui", "cancel", "Cancel"])]
        );

        let err = uploader.delete_remote(&RowKey::new("ui", "ok")).await.unwrap_err();
        assert!(matches!(err, SyncError::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_remote_takes_first_duplicate() {
        let sheets = MemorySheets::new(
            "Translations",
            &[&["cate", "key", "en"], &["ui", "ok", "one"], &["ui", "x", "X"], &["ui", "ok", "two"]],
        );
        let config = config(&["en"]);

        let offset = Uploader::new(&sheets, &config)
            .delete_remote(&RowKey::new("ui", "ok"))
            .await
            .unwrap();

        assert_eq!(offset, 0);
        assert_eq!(
            sheets.rows(),
            vec![strings(&["cate", "key", "en"]), strings(&["ui", "x", "X"]), strings(&["ui", "ok", "two"])]
        );
    }
}
