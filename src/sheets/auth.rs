//! Credentials for the Sheets API.
//!
//! Two sources are supported:
//! - `SHEETSYNC_ACCESS_TOKEN`: a pre-minted OAuth bearer token
//! - a service-account key file: an RS256-signed JWT assertion is exchanged
//!   at the key's `token_uri` for a bearer token
//!
//! Tokens are fetched once per invocation and never cached on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sync::{SyncError, SyncResult};

/// OAuth scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Environment variable holding a pre-minted access token.
pub const ACCESS_TOKEN_ENV: &str = "SHEETSYNC_ACCESS_TOKEN";

/// Environment variable conventionally holding a key file path.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for the assertion, in seconds (Google's maximum).
const ASSERTION_TTL_SECS: i64 = 3600;

/// Fields of a service-account key file used for signing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Read a key file.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteUnavailable` if the file is missing or is not
    /// a service-account key.
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::RemoteUnavailable(format!(
                "cannot read service-account key {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SyncError::RemoteUnavailable(format!(
                "{} is not a service-account key: {e}",
                path.display()
            ))
        })
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Build the signed JWT assertion for the token exchange.
///
/// # Errors
///
/// Returns `SyncError::RemoteUnavailable` if the private key is not a valid
/// RSA PEM key.
pub fn build_assertion(key: &ServiceAccountKey, issued_at: i64) -> SyncResult<String> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: key.token_uri(),
        iat: issued_at,
        exp: issued_at + ASSERTION_TTL_SECS,
    };

    let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SyncError::RemoteUnavailable(format!("invalid service-account private key: {e}")))?;

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
        &claims,
        &encoding_key,
    )
    .map_err(|e| SyncError::RemoteUnavailable(format!("failed to sign assertion: {e}")))
}

/// Where the bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Token supplied directly.
    AccessToken(String),
    /// Service-account key file to exchange for a token.
    ServiceAccount(PathBuf),
}

impl Credentials {
    /// Pick a credential source.
    ///
    /// Priority: `SHEETSYNC_ACCESS_TOKEN` > configured key file >
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteUnavailable` when no source is available.
    pub fn resolve(auth: Option<&Path>) -> SyncResult<Self> {
        let token = std::env::var(ACCESS_TOKEN_ENV).ok();
        let fallback = std::env::var(CREDENTIALS_ENV).ok().map(PathBuf::from);
        Self::choose(token, auth, fallback)
    }

    fn choose(token: Option<String>, auth: Option<&Path>, fallback: Option<PathBuf>) -> SyncResult<Self> {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            return Ok(Self::AccessToken(token.trim().to_string()));
        }
        if let Some(path) = auth {
            return Ok(Self::ServiceAccount(path.to_path_buf()));
        }
        if let Some(path) = fallback.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::ServiceAccount(path));
        }
        Err(SyncError::RemoteUnavailable(format!(
            "no credentials: set `auth` in the config, pass --auth, or set {ACCESS_TOKEN_ENV}"
        )))
    }

    /// Obtain a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteUnavailable` if the key cannot be read or the
    /// token endpoint refuses the assertion.
    pub async fn access_token(&self, client: &reqwest::Client) -> SyncResult<String> {
        match self {
            Self::AccessToken(token) => Ok(token.clone()),
            Self::ServiceAccount(path) => {
                let key = ServiceAccountKey::from_file(path)?;
                let assertion = build_assertion(&key, chrono::Utc::now().timestamp())?;

                tracing::debug!(client_email = %key.client_email, "exchanging service-account assertion");

                let response = client
                    .post(key.token_uri())
                    .form(&[
                        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                        ("assertion", assertion.as_str()),
                    ])
                    .send()
                    .await
                    .map_err(|e| SyncError::RemoteUnavailable(format!("token request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(SyncError::RemoteUnavailable(format!(
                        "token endpoint returned {status}: {body}"
                    )));
                }

                let token: TokenResponse = response.json().await.map_err(|e| {
                    SyncError::RemoteUnavailable(format!("failed to parse token response: {e}"))
                })?;
                Ok(token.access_token)
            }
        }
    }
}
