//! Command implementations.

pub mod catalog;
pub mod completions;
pub mod sync;
pub mod version;

use crate::config::SheetConfig;
use crate::error::{Error, Result};
use crate::sheets::SheetsClient;

/// Create the tokio runtime for one command.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Authenticate against the Sheets API for the configured spreadsheet.
async fn connect(config: &SheetConfig) -> Result<SheetsClient> {
    Ok(SheetsClient::connect(config).await?)
}

/// Print a `{success, message, ...}` envelope.
fn print_envelope(success: bool, message: &str, extra: serde_json::Value) -> Result<()> {
    let mut output = serde_json::json!({
        "success": success,
        "message": message,
    });
    if let (Some(obj), serde_json::Value::Object(fields)) = (output.as_object_mut(), extra) {
        obj.extend(fields);
    }
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
