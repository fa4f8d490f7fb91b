//! Wire types for the Google Sheets v4 REST API.
//!
//! Only the fields this crate reads or writes are modelled.

use serde::{Deserialize, Serialize};

/// Response of `GET /spreadsheets/{id}/values/{range}`.
///
/// `values` is omitted by the service when the range holds no data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<Vec<serde_json::Value>>>,
}

impl ValueRange {
    /// Cells as strings. Non-string cells are rendered with their JSON text.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Response of `GET /spreadsheets/{id}?fields=sheets.properties`.
#[derive(Debug, Default, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

/// Identity of one sheet (tab) inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Numeric sheet ID. The first sheet is usually `0`.
    #[serde(default)]
    pub sheet_id: i64,
    /// Display name.
    #[serde(default)]
    pub title: String,
}

/// Body of `POST /spreadsheets/{id}:batchUpdate`.
#[derive(Debug, Serialize)]
pub struct BatchUpdateRequest<'a> {
    pub requests: &'a [Request],
}

/// One request inside a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    AppendCells(AppendCellsRequest),
    UpdateCells(UpdateCellsRequest),
    DeleteDimension(DeleteDimensionRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendCellsRequest {
    pub sheet_id: i64,
    pub rows: Vec<RowData>,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellsRequest {
    pub range: GridRange,
    pub rows: Vec<RowData>,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDimensionRequest {
    pub range: DimensionRange,
}

/// Half-open cell rectangle, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

/// Half-open run of rows or columns, 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowData {
    pub values: Vec<CellData>,
}

impl RowData {
    /// A row of plain string cells.
    pub fn from_strings<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: cells
                .into_iter()
                .map(|s| CellData {
                    user_entered_value: ExtendedValue {
                        string_value: s.into(),
                    },
                })
                .collect(),
        }
    }

    /// Cell text, in column order.
    #[must_use]
    pub fn strings(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|c| c.user_entered_value.string_value.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_value: ExtendedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    pub string_value: String,
}

/// Error body returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_without_values_is_empty() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range":"'Translations'!A1:Z1000","majorDimension":"ROWS"}"#)
                .unwrap();
        assert!(range.into_rows().is_empty());
    }

    #[test]
    fn test_value_range_stringifies_cells() {
        let range: ValueRange =
            serde_json::from_str(r#"{"values":[["cate","key","en"],["ui","count",3]]}"#).unwrap();
        assert_eq!(range.into_rows()[1], vec!["ui", "count", "3"]);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = Request::DeleteDimension(DeleteDimensionRequest {
            range: DimensionRange {
                sheet_id: 7,
                dimension: Dimension::Rows,
                start_index: 3,
                end_index: 4,
            },
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "deleteDimension": {
                    "range": {"sheetId": 7, "dimension": "ROWS", "startIndex": 3, "endIndex": 4}
                }
            })
        );
    }

    #[test]
    fn test_row_data_wire_shape() {
        let json = serde_json::to_value(RowData::from_strings(["ui"])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"values": [{"userEnteredValue": {"stringValue": "ui"}}]})
        );
    }

    #[test]
    fn test_api_error_body() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error":{"code":400,"message":"Unable to parse range: Nope!A1:Z","status":"INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.code, 400);
        assert_eq!(body.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
