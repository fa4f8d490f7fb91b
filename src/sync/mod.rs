//! Catalog ⇄ sheet synchronization.
//!
//! This module reconciles the local JSON catalog with a Google Sheets range:
//!
//! - **Upload**: local catalog → diff against the sheet → one batch update
//! - **Download**: sheet → consolidated catalog + per-language locale files
//! - **Plan**: the upload diff, reported without being applied
//!
//! # Architecture
//!
//! Each stage is a separate module so the pure parts can be tested alone:
//! 1. `grid` reads the sheet and resolves columns by header label
//! 2. `local` reads and writes the JSON files
//! 3. `diff` compares both sides by `(category, key)` identity
//! 4. `translate` turns ops into `batchUpdate` requests with row bookkeeping
//! 5. `upload` / `download` orchestrate the stages
//!
//! # Row offsets
//!
//! Ops address rows by 0-based data-row offset. Offset `d` is sheet row
//! `d + 2` (A1, header included) and API grid index `d + 1`.
//!
//! # Example
//!
//! ```ignore
//! use sheetsync::sync::{Downloader, Uploader};
//!
//! let client = SheetsClient::connect(&config).await?;
//!
//! let report = Uploader::new(&client, &config).upload(Path::new("entire.json"), false).await?;
//! let stats = Downloader::new(&client, &config).download(Path::new("entire.json")).await?;
//! ```

mod diff;
mod download;
mod grid;
mod hash;
mod local;
mod translate;
mod types;
mod upload;

pub use diff::diff;
pub use download::Downloader;
pub use grid::{fetch_grid, read_remote, ColumnIndex, RemoteCatalog, RemoteRow, SheetGrid};
pub use hash::{content_hash, has_changed};
pub use local::{
    atomic_write, locale_entries, read_catalog, render_catalog, write_catalog, write_if_changed,
    write_locales,
};
pub use translate::{
    delete_request, grid_row_index, resolve_sheet_id, sheet_row_number, translate, RowLayout,
    CELL_FIELDS,
};
pub use types::{
    DownloadStats, LocaleFileInfo, MutationOp, RowValues, SyncError, SyncResult, UploadStats,
};
pub use upload::{UploadReport, Uploader};
