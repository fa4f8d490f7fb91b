//! Remote grid reading and column resolution.
//!
//! The sheet's first row is a header. Columns are located by label on every
//! read, so reordering or inserting columns in the sheet is harmless.

use crate::config::{HeaderLabels, SheetConfig};
use crate::model::{Catalog, RowKey, TranslationRecord};
use crate::sheets::SheetsApi;
use crate::sync::types::{SyncError, SyncResult};

/// Raw cell grid of one sheet range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    /// First row of the range.
    pub header: Vec<String>,
    /// Remaining rows; index `i` is data-row offset `i`.
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Split raw values into header and data rows.
    #[must_use]
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut rows = values.into_iter();
        let header = rows.next().unwrap_or_default();
        Self {
            header,
            rows: rows.collect(),
        }
    }

    /// True when the range holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !has_content(&self.header) && self.rows.is_empty()
    }

    /// Cell text at `column`, empty when the column is absent or the row is short.
    #[must_use]
    pub fn cell(row: &[String], column: Option<usize>) -> &str {
        column
            .and_then(|c| row.get(c))
            .map_or("", String::as_str)
    }
}

fn has_content(row: &[String]) -> bool {
    row.iter().any(|c| !c.is_empty())
}

/// Header positions of the columns the engine owns.
///
/// `None` means the label is not in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    pub category: Option<usize>,
    pub key: Option<usize>,
    /// Configured languages in configured order.
    pub langs: Vec<(String, Option<usize>)>,
}

impl ColumnIndex {
    /// Resolve columns by exact label match. For category and key the first
    /// accepted label present in the header wins.
    #[must_use]
    pub fn resolve(header: &[String], labels: &HeaderLabels, langs: &[String]) -> Self {
        Self {
            category: find_any(header, &labels.category),
            key: find_any(header, &labels.key),
            langs: langs
                .iter()
                .map(|lang| (lang.clone(), find_any(header, std::slice::from_ref(lang))))
                .collect(),
        }
    }

    /// Configured languages with no column in the header.
    #[must_use]
    pub fn missing_langs(&self) -> Vec<&str> {
        self.langs
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(lang, _)| lang.as_str())
            .collect()
    }
}

fn find_any(header: &[String], labels: &[String]) -> Option<usize> {
    labels
        .iter()
        .find_map(|label| header.iter().position(|cell| cell == label))
}

/// One data row of the sheet, with its position and parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRow {
    /// 0-based data-row offset.
    pub offset: usize,
    pub record: TranslationRecord,
    /// Cells as read, including columns the engine does not own.
    pub cells: Vec<String>,
}

/// The remote sheet indexed by row identity.
#[derive(Debug, Clone, Default)]
pub struct RemoteCatalog {
    header: Vec<String>,
    columns: ColumnIndex,
    rows: Vec<RemoteRow>,
    skipped: usize,
}

impl RemoteCatalog {
    /// Parse a grid.
    ///
    /// An empty grid is an empty catalog. Rows with an empty key are skipped
    /// but keep their offset, so later rows still address the right sheet row.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::HeaderMismatch` if the grid has content but the
    /// header lacks a category or key column.
    pub fn from_grid(
        grid: SheetGrid,
        sheet_name: &str,
        labels: &HeaderLabels,
        langs: &[String],
    ) -> SyncResult<Self> {
        if grid.is_empty() {
            return Ok(Self {
                columns: ColumnIndex::resolve(&[], labels, langs),
                ..Self::default()
            });
        }

        let columns = ColumnIndex::resolve(&grid.header, labels, langs);
        let missing = match (columns.category, columns.key) {
            (None, _) => Some(("category", &labels.category)),
            (_, None) => Some(("key", &labels.key)),
            _ => None,
        };
        if let Some((missing, expected)) = missing {
            return Err(SyncError::HeaderMismatch {
                sheet: sheet_name.to_string(),
                missing,
                expected: expected.clone(),
                header: grid.header,
            });
        }

        let missing_langs = columns.missing_langs();
        if !missing_langs.is_empty() {
            tracing::warn!(
                sheet = sheet_name,
                langs = ?missing_langs,
                "sheet has no column for some languages; reading them as empty"
            );
        }

        let mut rows = Vec::with_capacity(grid.rows.len());
        let mut skipped = 0;
        for (offset, cells) in grid.rows.into_iter().enumerate() {
            let key = SheetGrid::cell(&cells, columns.key);
            if key.is_empty() {
                skipped += 1;
                continue;
            }

            let mut record = TranslationRecord::new(SheetGrid::cell(&cells, columns.category), key);
            for (lang, column) in &columns.langs {
                record
                    .values
                    .insert(lang.clone(), SheetGrid::cell(&cells, *column).to_string());
            }
            rows.push(RemoteRow {
                offset,
                record,
                cells,
            });
        }

        if skipped > 0 {
            tracing::debug!(sheet = sheet_name, skipped, "skipped rows with an empty key");
        }

        Ok(Self {
            header: grid.header,
            columns,
            rows,
            skipped,
        })
    }

    /// Header row as read. Empty for an empty sheet.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    /// Rows with a key, in sheet order.
    #[must_use]
    pub fn rows(&self) -> &[RemoteRow] {
        &self.rows
    }

    /// Number of rows dropped for having an empty key.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Row at a data-row offset.
    #[must_use]
    pub fn row_at(&self, offset: usize) -> Option<&RemoteRow> {
        self.rows
            .binary_search_by_key(&offset, |r| r.offset)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// First row carrying the given identity.
    #[must_use]
    pub fn find(&self, key: &RowKey) -> Option<&RemoteRow> {
        self.rows
            .iter()
            .find(|r| r.record.category == key.category && r.record.key == key.key)
    }

    /// Records in sheet order.
    #[must_use]
    pub fn to_catalog(&self) -> Catalog {
        self.rows.iter().map(|r| r.record.clone()).collect()
    }
}

/// Read the configured range.
///
/// A range the service refuses to parse is checked against the spreadsheet's
/// sheet list so a misspelled sheet name reports the names that do exist.
///
/// # Errors
///
/// Returns `SyncError::SheetNotFound`, or whatever the transport returns.
pub async fn fetch_grid<S: SheetsApi>(sheets: &S, config: &SheetConfig) -> SyncResult<SheetGrid> {
    match sheets.get_values(&config.a1_range()).await {
        Ok(values) => Ok(SheetGrid::from_values(values)),
        Err(err @ SyncError::RemoteRejected { status: 400, .. }) => {
            let available: Vec<String> = sheets
                .get_sheet_properties()
                .await?
                .into_iter()
                .map(|p| p.title)
                .collect();
            if available.iter().any(|t| *t == config.sheet_name) {
                Err(err)
            } else {
                Err(SyncError::SheetNotFound {
                    name: config.sheet_name.clone(),
                    available,
                })
            }
        }
        Err(err) => Err(err),
    }
}

/// Read and index the configured sheet.
///
/// # Errors
///
/// See [`fetch_grid`] and [`RemoteCatalog::from_grid`].
pub async fn read_remote<S: SheetsApi>(sheets: &S, config: &SheetConfig) -> SyncResult<RemoteCatalog> {
    let grid = fetch_grid(sheets, config).await?;
    RemoteCatalog::from_grid(grid, &config.sheet_name, &config.headers, &config.langs)
}
