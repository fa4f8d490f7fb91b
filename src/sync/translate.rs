//! Mutation translator.
//!
//! Turns diff output into one list of Sheets `batchUpdate` requests.
//!
//! # Row addressing
//!
//! Ops carry 0-based data-row offsets. The header occupies sheet row 1, so
//! offset `d` is A1 row `d + 2` and API grid row index `d + 1`.
//!
//! # Request order
//!
//! 1. header write or repair (when needed)
//! 2. updates, at their original offsets
//! 3. deletes, by descending offset
//! 4. one `appendCells` for every new row
//!
//! Updates run before any row is removed and deletes run bottom-up, so every
//! offset computed from the original read stays valid while the batch applies.

use crate::config::HeaderLabels;
use crate::sheets::{
    AppendCellsRequest, DeleteDimensionRequest, Dimension, DimensionRange, GridRange, Request,
    RowData, SheetProperties, UpdateCellsRequest,
};
use crate::sync::grid::RemoteCatalog;
use crate::sync::types::{MutationOp, RowValues, SyncError, SyncResult};

/// Field mask for every cell write.
pub const CELL_FIELDS: &str = "userEnteredValue";

/// 1-based A1 row number of a data-row offset.
#[must_use]
pub const fn sheet_row_number(offset: usize) -> usize {
    offset + 2
}

/// 0-based API grid row index of a data-row offset.
#[must_use]
pub const fn grid_row_index(offset: usize) -> usize {
    offset + 1
}

/// Find the numeric ID of a sheet by display name.
///
/// # Errors
///
/// Returns `SyncError::SheetNotFound` listing the available names.
pub fn resolve_sheet_id(sheets: &[SheetProperties], name: &str) -> SyncResult<i64> {
    sheets
        .iter()
        .find(|s| s.title == name)
        .map(|s| s.sheet_id)
        .ok_or_else(|| SyncError::SheetNotFound {
            name: name.to_string(),
            available: sheets.iter().map(|s| s.title.clone()).collect(),
        })
}

/// Column placement for written rows.
///
/// Built from the header as read. Languages without a column get one
/// appended after the widest row, so unlabelled cells past the header are
/// never claimed, and the header is marked for rewrite. An empty sheet gets
/// a fresh header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    header: Vec<String>,
    header_changed: bool,
    category: usize,
    key: usize,
    langs: Vec<usize>,
}

impl RowLayout {
    #[must_use]
    pub fn new(remote: &RemoteCatalog, labels: &HeaderLabels, langs: &[String]) -> Self {
        let columns = remote.columns();
        let (Some(category), Some(key)) = (columns.category, columns.key) else {
            let mut header = vec![labels.category_label().to_string(), labels.key_label().to_string()];
            header.extend(langs.iter().cloned());
            return Self {
                header,
                header_changed: true,
                category: 0,
                key: 1,
                langs: (2..langs.len() + 2).collect(),
            };
        };

        let mut header = remote.header().to_vec();
        let mut header_changed = false;
        // The header read back has no trailing empty cells; data rows may be wider.
        let used_width = remote
            .rows()
            .iter()
            .map(|r| r.cells.len())
            .chain([header.len()])
            .max()
            .unwrap_or_default();
        let positions = langs
            .iter()
            .map(|lang| {
                header.iter().position(|cell| cell == lang).unwrap_or_else(|| {
                    header.resize(header.len().max(used_width), String::new());
                    header.push(lang.clone());
                    header_changed = true;
                    header.len() - 1
                })
            })
            .collect();

        Self {
            header,
            header_changed,
            category,
            key,
            langs: positions,
        }
    }

    /// Header row after any repair.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Whether the header must be written as part of the batch.
    #[must_use]
    pub const fn header_changed(&self) -> bool {
        self.header_changed
    }

    /// Lay out a row. Cells from `base` in columns the engine does not own
    /// are kept.
    #[must_use]
    pub fn render(&self, values: &RowValues, base: &[String]) -> Vec<String> {
        let width = self.header.len().max(base.len());
        let mut cells = base.to_vec();
        cells.resize(width, String::new());

        cells[self.category].clone_from(&values.category);
        cells[self.key].clone_from(&values.key);
        for (column, value) in self.langs.iter().zip(&values.values) {
            cells[*column].clone_from(value);
        }
        cells
    }
}

/// Build the delete request for one data row.
#[must_use]
pub fn delete_request(sheet_id: i64, offset: usize) -> Request {
    let index = grid_row_index(offset);
    Request::DeleteDimension(DeleteDimensionRequest {
        range: DimensionRange {
            sheet_id,
            dimension: Dimension::Rows,
            start_index: index,
            end_index: index + 1,
        },
    })
}

fn update_request(sheet_id: i64, row_index: usize, cells: Vec<String>) -> Request {
    Request::UpdateCells(UpdateCellsRequest {
        range: GridRange {
            sheet_id,
            start_row_index: row_index,
            end_row_index: row_index + 1,
            start_column_index: 0,
            end_column_index: cells.len(),
        },
        rows: vec![RowData::from_strings(cells)],
        fields: CELL_FIELDS.to_string(),
    })
}

/// Translate ops into batch requests for the sheet with `sheet_id`.
///
/// Returns an empty list when there is nothing to do; a header repair alone
/// is not sent.
#[must_use]
pub fn translate(
    ops: &[MutationOp],
    layout: &RowLayout,
    remote: &RemoteCatalog,
    sheet_id: i64,
) -> Vec<Request> {
    if ops.is_empty() {
        return Vec::new();
    }

    let mut requests = Vec::new();
    if layout.header_changed() {
        requests.push(update_request(sheet_id, 0, layout.header().to_vec()));
    }

    let mut deletes = Vec::new();
    let mut appends = Vec::new();
    for op in ops {
        match op {
            MutationOp::Update { row, values } => {
                let base = remote.row_at(*row).map_or(&[][..], |r| r.cells.as_slice());
                requests.push(update_request(
                    sheet_id,
                    grid_row_index(*row),
                    layout.render(values, base),
                ));
            }
            MutationOp::Delete { row, .. } => deletes.push(*row),
            MutationOp::Append(values) => appends.push(RowData::from_strings(layout.render(values, &[]))),
        }
    }

    deletes.sort_unstable_by(|a, b| b.cmp(a));
    requests.extend(deletes.into_iter().map(|row| delete_request(sheet_id, row)));

    if !appends.is_empty() {
        requests.push(Request::AppendCells(AppendCellsRequest {
            sheet_id,
            rows: appends,
            fields: CELL_FIELDS.to_string(),
        }));
    }

    requests
}
