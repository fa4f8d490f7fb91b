//! In-memory spreadsheet used by tests.
//!
//! Applies batch requests to a grid the way the service does: requests run
//! in order, `appendCells` lands after the last non-empty row, and a failed
//! batch leaves the grid untouched.

use std::sync::Mutex;

use super::types::{Dimension, Request, SheetProperties};
use super::SheetsApi;
use crate::sync::{SyncError, SyncResult};

pub(crate) struct MemorySheets {
    sheet: SheetProperties,
    grid: Mutex<Vec<Vec<String>>>,
    batches: Mutex<Vec<Vec<Request>>>,
}

impl MemorySheets {
    pub(crate) fn new(title: &str, rows: &[&[&str]]) -> Self {
        Self {
            sheet: SheetProperties {
                sheet_id: 42,
                title: title.to_string(),
            },
            grid: Mutex::new(
                rows.iter()
                    .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                    .collect(),
            ),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Current grid, with trailing empty cells and rows trimmed like the API.
    pub(crate) fn rows(&self) -> Vec<Vec<String>> {
        trimmed(&self.grid.lock().unwrap())
    }

    /// Every batch received so far.
    pub(crate) fn batches(&self) -> Vec<Vec<Request>> {
        self.batches.lock().unwrap().clone()
    }

    fn apply(grid: &mut Vec<Vec<String>>, request: &Request, sheet_id: i64) -> SyncResult<()> {
        match request {
            Request::AppendCells(req) => {
                check_sheet(req.sheet_id, sheet_id)?;
                let mut rows = trimmed(grid);
                rows.extend(req.rows.iter().map(super::types::RowData::strings));
                *grid = rows;
            }
            Request::UpdateCells(req) => {
                check_sheet(req.range.sheet_id, sheet_id)?;
                for (i, row) in req.rows.iter().enumerate() {
                    let index = req.range.start_row_index + i;
                    if grid.len() <= index {
                        grid.resize(index + 1, Vec::new());
                    }
                    let target = &mut grid[index];
                    let end = req.range.end_column_index.max(req.range.start_column_index + row.values.len());
                    if target.len() < end {
                        target.resize(end, String::new());
                    }
                    for (j, cell) in row.strings().into_iter().enumerate() {
                        target[req.range.start_column_index + j] = cell;
                    }
                }
            }
            Request::DeleteDimension(req) => {
                check_sheet(req.range.sheet_id, sheet_id)?;
                if req.range.dimension != Dimension::Rows || req.range.end_index > grid.len() {
                    return Err(SyncError::RemoteRejected {
                        status: 400,
                        message: format!("deleteDimension out of range: {}..{}", req.range.start_index, req.range.end_index),
                        reason: Some("INVALID_ARGUMENT".into()),
                    });
                }
                grid.drain(req.range.start_index..req.range.end_index);
            }
        }
        Ok(())
    }
}

fn check_sheet(requested: i64, actual: i64) -> SyncResult<()> {
    if requested == actual {
        Ok(())
    } else {
        Err(SyncError::RemoteRejected {
            status: 400,
            message: format!("No grid with id: {requested}"),
            reason: Some("INVALID_ARGUMENT".into()),
        })
    }
}

fn trimmed(grid: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = grid
        .iter()
        .map(|row| {
            let len = row.iter().rposition(|c| !c.is_empty()).map_or(0, |p| p + 1);
            row[..len].to_vec()
        })
        .collect();
    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    rows
}

impl SheetsApi for MemorySheets {
    async fn get_values(&self, range: &str) -> SyncResult<Vec<Vec<String>>> {
        let (name, _) = range.rsplit_once('!').unwrap_or((range, ""));
        let name = name.trim_matches('\'').replace("''", "'");
        if name != self.sheet.title {
            return Err(SyncError::RemoteRejected {
                status: 400,
                message: format!("Unable to parse range: {range}"),
                reason: Some("INVALID_ARGUMENT".into()),
            });
        }
        Ok(self.rows())
    }

    async fn get_sheet_properties(&self) -> SyncResult<Vec<SheetProperties>> {
        Ok(vec![self.sheet.clone()])
    }

    async fn batch_update(&self, requests: &[Request]) -> SyncResult<()> {
        let mut grid = self.grid.lock().unwrap();
        let mut working = grid.clone();
        for request in requests {
            Self::apply(&mut working, request, self.sheet.sheet_id)?;
        }
        *grid = working;
        self.batches.lock().unwrap().push(requests.to_vec());
        Ok(())
    }
}
