//! Google Sheets transport.
//!
//! The sync engine talks to the spreadsheet through the [`SheetsApi`] trait:
//!
//! - **Read**: the full value grid of a range
//! - **Metadata**: sheet names and numeric sheet IDs
//! - **Write**: one atomic `batchUpdate` holding every mutation
//!
//! [`SheetsClient`] implements it over HTTPS. Tests use an in-memory
//! implementation that applies batch requests to a grid.

mod auth;
mod client;
#[cfg(test)]
pub(crate) mod memory;
mod types;

pub use auth::{build_assertion, Credentials, ServiceAccountKey, ACCESS_TOKEN_ENV, SHEETS_SCOPE};
pub use client::{SheetsClient, API_BASE_ENV, DEFAULT_API_BASE};
pub use types::{
    AppendCellsRequest, CellData, DeleteDimensionRequest, Dimension, DimensionRange,
    ExtendedValue, GridRange, Request, RowData, SheetProperties, UpdateCellsRequest, ValueRange,
};

use crate::sync::SyncResult;

/// Operations the sync engine needs from a spreadsheet.
///
/// One implementation is bound to one spreadsheet.
pub trait SheetsApi: Send + Sync {
    /// Read every row of an A1 range (e.g. `'Translations'!A1:Z`).
    ///
    /// Returns an empty vector when the range holds no data. Rows may be
    /// shorter than the range because trailing empty cells are omitted.
    fn get_values(&self, range: &str) -> impl std::future::Future<Output = SyncResult<Vec<Vec<String>>>> + Send;

    /// List the sheets (tabs) of the spreadsheet.
    fn get_sheet_properties(&self) -> impl std::future::Future<Output = SyncResult<Vec<SheetProperties>>> + Send;

    /// Apply all requests atomically, in order.
    fn batch_update(&self, requests: &[Request]) -> impl std::future::Future<Output = SyncResult<()>> + Send;
}
