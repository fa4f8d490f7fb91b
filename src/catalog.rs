//! Record-level operations on the catalog.
//!
//! These are the editing entry points: list, add, delete and reset. Add and
//! delete keep the sheet authoritative: they push the change and then pull
//! the sheet back so the local files reflect what the sheet now holds.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::SheetConfig;
use crate::error::{Error, Result};
use crate::model::{Catalog, RowKey, TranslationRecord};
use crate::sheets::SheetsApi;
use crate::sync::{
    atomic_write, read_catalog, write_catalog, DownloadStats, Downloader, SyncError, UploadStats,
    Uploader,
};

/// Result of an add.
#[derive(Debug, Serialize)]
pub struct AddReport {
    pub upload: UploadStats,
    pub download: DownloadStats,
}

/// Read the local catalog.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn list(path: &Path) -> Result<Catalog> {
    Ok(read_catalog(path)?)
}

/// Read the local catalog, treating a missing file as empty.
fn read_or_empty(path: &Path) -> Result<Catalog> {
    match read_catalog(path) {
        Ok(catalog) => Ok(catalog),
        Err(SyncError::FileNotFound(_)) => Ok(Catalog::new()),
        Err(e) => Err(e.into()),
    }
}

/// Append a record to the local catalog file.
///
/// # Errors
///
/// Returns `Error::DuplicateRecord` if the identity already exists, or an
/// error if the file cannot be read or written.
pub fn add_local(path: &Path, record: TranslationRecord, langs: &[String]) -> Result<Catalog> {
    let mut catalog = read_or_empty(path)?;
    let key = record.row_key();
    if catalog.contains(&key) {
        return Err(Error::DuplicateRecord(key));
    }

    catalog.push(record);
    write_catalog(path, &catalog, langs)?;
    info!(%key, path = %path.display(), "added record locally");
    Ok(catalog)
}

/// Add a record, push it to the sheet and refresh the local files.
///
/// The record is written locally first; if the upload then fails the local
/// file keeps the record and the next upload retries it.
///
/// # Errors
///
/// Returns `Error::DuplicateRecord` for an existing identity, or any upload
/// or download error.
pub async fn add<S: SheetsApi>(
    sheets: &S,
    config: &SheetConfig,
    path: &Path,
    record: TranslationRecord,
) -> Result<AddReport> {
    let catalog = add_local(path, record, &config.langs)?;

    let upload = Uploader::new(sheets, config)
        .upload_catalog(&catalog, false)
        .await?
        .stats;
    let download = Downloader::new(sheets, config).download(path).await?;

    Ok(AddReport { upload, download })
}

/// Delete one record from the sheet, then refresh the local files.
///
/// # Errors
///
/// Returns `SyncError::RecordNotFound` if the sheet has no such row, or any
/// download error.
pub async fn delete<S: SheetsApi>(
    sheets: &S,
    config: &SheetConfig,
    path: &Path,
    key: &RowKey,
) -> Result<DownloadStats> {
    Uploader::new(sheets, config).delete_remote(key).await?;
    let stats = Downloader::new(sheets, config).download(path).await?;

    // A sheet left with only its header writes nothing on download.
    if stats.is_empty() {
        let mut catalog = read_or_empty(path)?;
        if catalog.remove(key) > 0 {
            write_catalog(path, &catalog, &config.langs)?;
        }
    }

    Ok(stats)
}

/// Empty the local catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn reset(path: &Path) -> Result<()> {
    atomic_write(path, "[]\n")?;
    info!(path = %path.display(), "reset local catalog");
    Ok(())
}
