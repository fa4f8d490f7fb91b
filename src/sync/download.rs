//! Download: rebuild the local files from the sheet.
//!
//! Pipeline: read remote → catalog → consolidated JSON + one file per language.

use std::path::Path;

use tracing::info;

use crate::config::SheetConfig;
use crate::model::Catalog;
use crate::sheets::SheetsApi;
use crate::sync::grid::{fetch_grid, RemoteCatalog};
use crate::sync::local::{write_catalog, write_locales};
use crate::sync::types::{DownloadStats, SyncResult};

/// Pulls one sheet into local files.
pub struct Downloader<'a, S: SheetsApi> {
    sheets: &'a S,
    config: &'a SheetConfig,
}

impl<'a, S: SheetsApi> Downloader<'a, S> {
    /// Create a new downloader.
    pub const fn new(sheets: &'a S, config: &'a SheetConfig) -> Self {
        Self { sheets, config }
    }

    /// Read the sheet as a catalog, or `None` when it has no data rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be read or its header lacks a
    /// category or key column.
    pub async fn fetch_catalog(&self) -> SyncResult<Option<RemoteCatalog>> {
        let config = self.config;
        let grid = fetch_grid(self.sheets, config).await?;
        if grid.rows.is_empty() {
            return Ok(None);
        }
        RemoteCatalog::from_grid(grid, &config.sheet_name, &config.headers, &config.langs).map(Some)
    }

    /// Write the sheet's content to `out_path` and the locale directory.
    ///
    /// A sheet with fewer than two rows (header only, or nothing) writes
    /// nothing and returns empty stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be read or a file cannot be
    /// written.
    pub async fn download(&self, out_path: &Path) -> SyncResult<DownloadStats> {
        let config = self.config;
        let Some(remote) = self.fetch_catalog().await? else {
            info!(sheet = %config.sheet_name, "sheet has no data rows, nothing written");
            return Ok(DownloadStats::default());
        };

        let catalog: Catalog = remote.to_catalog();
        let catalog_changed = write_catalog(out_path, &catalog, &config.langs)?;
        let locale_files = write_locales(&config.locales_dir, &catalog, &config.langs)?;

        info!(
            path = %out_path.display(),
            records = catalog.len(),
            changed = catalog_changed,
            "download complete"
        );

        Ok(DownloadStats {
            records: catalog.len(),
            skipped: remote.skipped(),
            catalog_changed,
            locale_files,
        })
    }
}
