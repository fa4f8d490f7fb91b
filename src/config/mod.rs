//! Configuration management.
//!
//! This module discovers and loads the sync configuration, merges CLI
//! overrides on top of it, and validates the result.
//!
//! # Resolution
//!
//! The configuration file is a JSON object with camelCase keys:
//!
//! ```json
//! {
//!   "sheetId": "1Pi_siQa...",
//!   "auth": "googleApi.json",
//!   "langs": ["zh-TW", "en-US"],
//!   "sheetName": "Translations",
//!   "baseLang": "zh-TW"
//! }
//! ```
//!
//! The resulting [`SheetConfig`] is an explicit value passed into every
//! sync entry point. Nothing is cached between invocations.

use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sheetsync.json";

/// Default local catalog file.
pub const DEFAULT_CATALOG_FILE: &str = "entire.json";

fn default_sheet_name() -> String {
    "Translations".to_string()
}

fn default_base_lang() -> String {
    "en".to_string()
}

fn default_locales_dir() -> PathBuf {
    PathBuf::from("locales")
}

fn default_range() -> String {
    "A1:Z".to_string()
}

/// Accepted header labels for the category and key columns.
///
/// Deployments label these columns differently (`分類`/`Key`,
/// `ResourceType`/`ResourceKey`). The first label found in the header wins;
/// the first label of each list is used when a fresh header is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    /// Labels accepted for the category column.
    pub category: Vec<String>,
    /// Labels accepted for the key column.
    pub key: Vec<String>,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            category: vec!["分類".into(), "ResourceType".into(), "cate".into()],
            key: vec!["Key".into(), "key".into(), "ResourceKey".into()],
        }
    }
}

impl HeaderLabels {
    /// Label used for the category column when writing a new header.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.first().map_or("cate", String::as_str)
    }

    /// Label used for the key column when writing a new header.
    #[must_use]
    pub fn key_label(&self) -> &str {
        self.key.first().map_or("key", String::as_str)
    }
}

/// Sync configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    /// Spreadsheet ID (the long token in the sheet URL).
    #[serde(default)]
    pub sheet_id: String,

    /// Path to a Google service-account key file.
    #[serde(default)]
    pub auth: Option<PathBuf>,

    /// Language tags, in column order.
    #[serde(default)]
    pub langs: Vec<String>,

    /// Sheet (tab) display name.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Language that must be filled for a record to be added.
    #[serde(default = "default_base_lang")]
    pub base_lang: String,

    /// Header label schemes.
    #[serde(default)]
    pub headers: HeaderLabels,

    /// Directory receiving the per-language files.
    #[serde(default = "default_locales_dir")]
    pub locales_dir: PathBuf,

    /// Cell range read from the sheet, without the sheet name.
    #[serde(default = "default_range")]
    pub range: String,
}

impl SheetConfig {
    /// Create a configuration with defaults for everything but the sheet and languages.
    pub fn new(sheet_id: impl Into<String>, langs: Vec<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            auth: None,
            langs,
            sheet_name: default_sheet_name(),
            base_lang: default_base_lang(),
            headers: HeaderLabels::default(),
            locales_dir: default_locales_dir(),
            range: default_range(),
        }
    }

    /// A1 range covering the configured sheet, e.g. `'Translations'!A1:Z`.
    #[must_use]
    pub fn a1_range(&self) -> String {
        format!("{}!{}", quote_sheet_name(&self.sheet_name), self.range)
    }

    /// Number of columns the configured range reaches (`A1:Z` is 26), or
    /// `None` for a row-only range such as `1:1000`.
    #[must_use]
    pub fn column_limit(&self) -> Option<usize> {
        let end = self.range.rsplit(':').next().unwrap_or(&self.range);
        let letters: String = end.chars().take_while(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return None;
        }
        Some(
            letters
                .bytes()
                .map(|b| usize::from(b.to_ascii_uppercase() - b'A') + 1)
                .fold(0, |acc, digit| acc * 26 + digit),
        )
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the sheet ID or language list is missing.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_id.trim().is_empty() {
            return Err(Error::Config(
                "sheetId is required (set it in the config file or pass --sheet-id)".into(),
            ));
        }
        if self.langs.is_empty() {
            return Err(Error::Config(
                "at least one language is required (langs / --langs)".into(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(Error::Config("sheetName must not be empty".into()));
        }
        if !self.langs.contains(&self.base_lang) {
            tracing::warn!(
                base_lang = %self.base_lang,
                "base language is not one of the configured languages"
            );
        }
        Ok(())
    }
}

/// Quote a sheet name for A1 notation, doubling embedded quotes.
#[must_use]
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Values supplied on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub sheet_id: Option<String>,
    pub auth: Option<PathBuf>,
    pub langs: Option<Vec<String>>,
    pub sheet_name: Option<String>,
    pub base_lang: Option<String>,
    pub locales_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut SheetConfig) {
        if let Some(sheet_id) = &self.sheet_id {
            config.sheet_id.clone_from(sheet_id);
        }
        if let Some(auth) = &self.auth {
            config.auth = Some(auth.clone());
        }
        if let Some(langs) = &self.langs {
            config.langs.clone_from(langs);
        }
        if let Some(name) = self.sheet_name.as_ref().filter(|n| !n.is_empty()) {
            config.sheet_name.clone_from(name);
        }
        if let Some(base_lang) = &self.base_lang {
            config.base_lang.clone_from(base_lang);
        }
        if let Some(dir) = &self.locales_dir {
            config.locales_dir.clone_from(dir);
        }
    }
}

/// Split a comma-separated language list, dropping blanks.
#[must_use]
pub fn parse_lang_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Get the global sheetsync directory (`~/.sheetsync/`).
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sheetsync"))
}

/// Resolve the configuration file path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `sheetsync.json` in the current directory
/// 3. Global location: `~/.sheetsync/config.json`
///
/// Returns `None` when no file exists; flags alone may still be enough.
#[must_use]
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    global_config_dir()
        .map(|dir| dir.join("config.json"))
        .filter(|p| p.is_file())
}

/// Read and parse a configuration file.
///
/// Relative `auth` and `localesDir` paths are resolved against the file's
/// directory.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<SheetConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    let raw: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
    })?;
    let has_locales_dir = raw.get("localesDir").is_some();

    let mut config: SheetConfig = serde_json::from_value(raw).map_err(|e| {
        Error::Config(format!("Invalid config file {}: {e}", path.display()))
    })?;

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Some(auth) = config.auth.as_mut().filter(|a| a.is_relative()) {
            *auth = base.join(&*auth);
        }
        if has_locales_dir && config.locales_dir.is_relative() {
            config.locales_dir = base.join(&config.locales_dir);
        }
    }

    Ok(config)
}

/// Load the effective configuration.
///
/// Reads the resolved config file (if any), applies CLI overrides, and
/// validates the result.
///
/// # Errors
///
/// Returns `Error::Config` if an explicit file is missing, a file is
/// malformed, or required fields are absent after merging.
pub fn load_config(explicit_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SheetConfig> {
    let mut config = match resolve_config_path(explicit_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            load_config_file(&path)?
        }
        None => SheetConfig::new(String::new(), Vec::new()),
    };

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_minimal_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"sheetId":"abc","langs":["en","fr"]}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.sheet_id, "abc");
        assert_eq!(config.sheet_name, "Translations");
        assert_eq!(config.base_lang, "en");
        assert_eq!(config.locales_dir, PathBuf::from("locales"));
        assert_eq!(config.headers, HeaderLabels::default());
    }

    #[test]
    fn test_relative_auth_resolves_against_file_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"sheetId":"abc","langs":["en"],"auth":"key.json"}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.auth, Some(temp_dir.path().join("key.json")));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{"sheetId":"abc","langs":["en"],"sheetName":"Old","baseLang":"en"}"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            langs: Some(vec!["zh-TW".into(), "en".into()]),
            sheet_name: Some("New".into()),
            base_lang: Some("zh-TW".into()),
            ..ConfigOverrides::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.langs, vec!["zh-TW", "en"]);
        assert_eq!(config.sheet_name, "New");
        assert_eq!(config.base_lang, "zh-TW");
    }

    #[test]
    fn test_empty_sheet_name_override_is_ignored() {
        let mut config = SheetConfig::new("abc", vec!["en".into()]);
        let overrides = ConfigOverrides {
            sheet_name: Some(String::new()),
            ..ConfigOverrides::default()
        };
        overrides.apply(&mut config);
        assert_eq!(config.sheet_name, "Translations");
    }

    #[test]
    fn test_validate_requires_sheet_and_langs() {
        assert!(matches!(
            SheetConfig::new("", vec!["en".into()]).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SheetConfig::new("abc", Vec::new()).validate(),
            Err(Error::Config(_))
        ));
        assert!(SheetConfig::new("abc", vec!["en".into()]).validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let result = load_config(
            Some(Path::new("/nonexistent/sheetsync.json")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_column_limit() {
        let mut config = SheetConfig::new("abc", vec!["en".into()]);
        assert_eq!(config.column_limit(), Some(26));

        config.range = "A1:AB".into();
        assert_eq!(config.column_limit(), Some(28));

        config.range = "b2:zz500".into();
        assert_eq!(config.column_limit(), Some(702));

        config.range = "1:1000".into();
        assert_eq!(config.column_limit(), None);
    }

    #[test]
    fn test_a1_range_quotes_sheet_name() {
        let mut config = SheetConfig::new("abc", vec!["en".into()]);
        assert_eq!(config.a1_range(), "'Translations'!A1:Z");

        config.sheet_name = "Bob's sheet".into();
        assert_eq!(config.a1_range(), "'Bob''s sheet'!A1:Z");
    }

    #[test]
    fn test_parse_lang_list() {
        assert_eq!(parse_lang_list("zh-TW, en-US,,vi-VN "), vec!["zh-TW", "en-US", "vi-VN"]);
        assert!(parse_lang_list("").is_empty());
    }
}
