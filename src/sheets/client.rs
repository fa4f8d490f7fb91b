//! HTTPS client for the Sheets v4 API.

use std::time::Duration;

use reqwest::StatusCode;

use super::auth::Credentials;
use super::types::{ApiErrorBody, BatchUpdateRequest, Request, SheetProperties, Spreadsheet, ValueRange};
use super::SheetsApi;
use crate::config::SheetConfig;
use crate::sync::{SyncError, SyncResult};

/// Production API root.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Environment variable overriding the API root (proxies, emulators).
pub const API_BASE_ENV: &str = "SHEETSYNC_API_BASE";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sheets API client bound to one spreadsheet.
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsClient {
    /// Authenticate and build a client for the configured spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteUnavailable` if no credentials are available
    /// or the token exchange fails.
    pub async fn connect(config: &SheetConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::RemoteUnavailable(format!("failed to build HTTP client: {e}")))?;

        let credentials = Credentials::resolve(config.auth.as_deref())?;
        let token = credentials.access_token(&client).await?;

        Ok(Self::with_token(client, config.sheet_id.clone(), token).with_base_url(resolve_api_base()))
    }

    /// Build a client from an existing HTTP client and bearer token.
    #[must_use]
    pub fn with_token(client: reqwest::Client, spreadsheet_id: String, token: String) -> Self {
        Self {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            spreadsheet_id,
            token,
        }
    }

    /// Point the client at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build an endpoint URL, percent-encoding every path segment.
    fn url(&self, segments: &[&str]) -> SyncResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SyncError::RemoteUnavailable(format!("invalid API base {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| SyncError::RemoteUnavailable(format!("invalid API base {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> SyncResult<reqwest::Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Resolve the API root from the environment, falling back to production.
fn resolve_api_base() -> String {
    match std::env::var(API_BASE_ENV) {
        Ok(base) if !base.is_empty() => base,
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// Turn a non-success response into a sync error.
///
/// Authentication failures mean the service is unreachable for us; anything
/// else is a rejection carrying the service's structured detail.
fn classify_failure(status: StatusCode, body: &str) -> SyncError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return SyncError::RemoteUnavailable(format!("authorization failed ({status}): {message}"));
    }

    SyncError::RemoteRejected {
        status: status.as_u16(),
        message,
        reason: parsed.and_then(|b| b.error.status),
    }
}

impl SheetsApi for SheetsClient {
    async fn get_values(&self, range: &str) -> SyncResult<Vec<Vec<String>>> {
        let url = self.url(&["spreadsheets", &self.spreadsheet_id, "values", range])?;
        tracing::debug!(%url, "reading values");

        let response = self.send(self.client.get(url)).await?;
        let data: ValueRange = response
            .json()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("failed to parse values response: {e}")))?;

        Ok(data.into_rows())
    }

    async fn get_sheet_properties(&self) -> SyncResult<Vec<SheetProperties>> {
        let mut url = self.url(&["spreadsheets", &self.spreadsheet_id])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");
        tracing::debug!(%url, "reading spreadsheet metadata");

        let response = self.send(self.client.get(url)).await?;
        let data: Spreadsheet = response
            .json()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("failed to parse spreadsheet metadata: {e}")))?;

        Ok(data.sheets.into_iter().map(|s| s.properties).collect())
    }

    async fn batch_update(&self, requests: &[Request]) -> SyncResult<()> {
        let endpoint = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.url(&["spreadsheets", &endpoint])?;
        tracing::debug!(%url, requests = requests.len(), "sending batch update");

        self.send(self.client.post(url).json(&BatchUpdateRequest { requests }))
            .await?;
        Ok(())
    }
}
