//! Local catalog files.
//!
//! This module reads and writes the files the sync touches on disk:
//! - the consolidated catalog, a JSON array of `{cate, key, <lang>...}` objects
//! - one flat `{"category.key": value}` file per language
//!
//! Every write is atomic: write to a temp file, sync to disk, then rename.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{Catalog, TranslationRecord, CATEGORY_FIELD, KEY_FIELD};
use crate::sync::hash::{content_hash, has_changed};
use crate::sync::types::{LocaleFileInfo, SyncError, SyncResult};

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> SyncResult<()> {
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `content` unless the file already holds exactly that.
///
/// Returns whether the file changed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_if_changed(path: &Path, content: &str) -> SyncResult<bool> {
    let stored = fs::read(path).ok().map(|bytes| content_hash(&bytes));
    if !has_changed(&content_hash(content.as_bytes()), stored.as_deref()) {
        tracing::debug!(path = %path.display(), "unchanged, not rewriting");
        return Ok(false);
    }
    atomic_write(path, content)?;
    Ok(true)
}

/// Read the consolidated catalog.
///
/// Numbers and booleans are read as their text, `null` as empty. Records
/// with an empty key are dropped.
///
/// # Errors
///
/// Returns `SyncError::FileNotFound` if the file does not exist and
/// `SyncError::MalformedLocalData` if it is not an array of flat objects.
pub fn read_catalog(path: &Path) -> SyncResult<Catalog> {
    if !path.exists() {
        return Err(SyncError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let malformed = |message: String| SyncError::MalformedLocalData {
        path: path.display().to_string(),
        message,
    };

    let document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
    let serde_json::Value::Array(items) = document else {
        return Err(malformed("expected a JSON array of objects".into()));
    };

    let mut catalog = Catalog::new();
    let mut dropped = 0;
    for (index, item) in items.into_iter().enumerate() {
        let serde_json::Value::Object(fields) = item else {
            return Err(malformed(format!("element {index} is not an object")));
        };

        let mut record = TranslationRecord::default();
        for (name, value) in fields {
            let text = scalar_text(value)
                .ok_or_else(|| malformed(format!("element {index}: property \"{name}\" is not a scalar")))?;
            match name.as_str() {
                CATEGORY_FIELD => record.category = text,
                KEY_FIELD => record.key = text,
                _ => {
                    record.values.insert(name, text);
                }
            }
        }

        if record.key.is_empty() {
            dropped += 1;
            continue;
        }
        catalog.push(record);
    }

    if dropped > 0 {
        tracing::warn!(path = %path.display(), dropped, "dropped records with an empty key");
    }

    Ok(catalog)
}

fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => Some(String::new()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

/// One record serialized with a fixed property order.
struct OrderedRecord<'a> {
    record: &'a TranslationRecord,
    langs: &'a [String],
}

impl Serialize for OrderedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(CATEGORY_FIELD, &self.record.category)?;
        map.serialize_entry(KEY_FIELD, &self.record.key)?;
        for lang in self.langs {
            map.serialize_entry(lang, self.record.value(lang))?;
        }
        for (lang, value) in &self.record.values {
            if !self.langs.contains(lang) {
                map.serialize_entry(lang, value)?;
            }
        }
        map.end()
    }
}

/// Render the catalog as pretty JSON.
///
/// Each object lists `cate`, `key`, the configured languages in order, then
/// any other languages alphabetically.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_catalog(catalog: &Catalog, langs: &[String]) -> SyncResult<String> {
    let ordered: Vec<OrderedRecord<'_>> = catalog
        .iter()
        .map(|record| OrderedRecord { record, langs })
        .collect();
    let mut content = serde_json::to_string_pretty(&ordered)?;
    content.push('\n');
    Ok(content)
}

/// Write the consolidated catalog. Returns whether the file changed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_catalog(path: &Path, catalog: &Catalog, langs: &[String]) -> SyncResult<bool> {
    write_if_changed(path, &render_catalog(catalog, langs)?)
}

/// Flat `"category.key" -> value` entries for one language.
///
/// Records with an empty category or key are left out. Keys are sorted, so
/// reordering rows in the sheet leaves the files unchanged.
#[must_use]
pub fn locale_entries(catalog: &Catalog, lang: &str) -> BTreeMap<String, String> {
    catalog
        .iter()
        .filter(|r| !r.category.is_empty() && !r.key.is_empty())
        .map(|r| (r.row_key().dotted(), r.value(lang).to_string()))
        .collect()
}

/// Write `<dir>/<lang>.json` for every configured language.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn write_locales(dir: &Path, catalog: &Catalog, langs: &[String]) -> SyncResult<Vec<LocaleFileInfo>> {
    langs
        .iter()
        .map(|lang| -> SyncResult<LocaleFileInfo> {
            let entries = locale_entries(catalog, lang);
            let path = dir.join(format!("{lang}.json"));
            let mut content = serde_json::to_string_pretty(&entries)?;
            content.push('\n');
            let changed = write_if_changed(&path, &content)?;

            tracing::debug!(lang = %lang, entries = entries.len(), changed, "wrote locale file");

            Ok(LocaleFileInfo {
                lang: lang.clone(),
                path: path.display().to_string(),
                entries: entries.len(),
                changed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn langs(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("entire.json");

        atomic_write(&path, "[]\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
        assert!(!temp_dir.path().join("nested").join("entire.json.tmp").exists());
    }

    #[test]
    fn test_read_catalog_coerces_scalars() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        fs::write(
            &path,
            r#"[{"cate":"ui","key":"count","en":3,"fr":null,"de":true},{"cate":"ui","key":"","en":"dropped"}]"#,
        )
        .unwrap();

        let catalog = read_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let record = &catalog.records()[0];
        assert_eq!(record.value("en"), "3");
        assert_eq!(record.value("fr"), "");
        assert_eq!(record.value("de"), "true");
    }

    #[test]
    fn test_read_catalog_rejects_non_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        fs::write(&path, r#"{"cate":"ui","key":"ok"}"#).unwrap();

        assert!(matches!(read_catalog(&path), Err(SyncError::MalformedLocalData { .. })));
    }

    #[test]
    fn test_read_catalog_rejects_nested_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        fs::write(&path, r#"[{"cate":"ui","key":"ok","en":["OK"]}]"#).unwrap();

        match read_catalog(&path) {
            Err(SyncError::MalformedLocalData { message, .. }) => assert!(message.contains("\"en\"")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_catalog_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        fs::write(&path, "[{").unwrap();

        assert!(matches!(read_catalog(&path), Err(SyncError::MalformedLocalData { .. })));
    }

    #[test]
    fn test_file_not_found() {
        let result = read_catalog(Path::new("/nonexistent/entire.json"));
        assert!(matches!(result, Err(SyncError::FileNotFound(_))));
    }

    #[test]
    fn test_render_catalog_property_order() {
        let catalog: Catalog = [TranslationRecord::new("ui", "ok")
            .with_value("vi-VN", "Được")
            .with_value("en-US", "OK")
            .with_value("de", "Gut")]
        .into_iter()
        .collect();

        let content = render_catalog(&catalog, &langs(&["zh-TW", "en-US", "vi-VN"])).unwrap();
        assert_eq!(
            content,
            "[\n  {\n    \"cate\": \"ui\",\n    \"key\": \"ok\",\n    \"zh-TW\": \"\",\n    \"en-US\": \"OK\",\n    \"vi-VN\": \"Được\",\n    \"de\": \"Gut\"\n  }\n]\n"
        );
    }

    #[test]
    fn test_write_catalog_then_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entire.json");
        let catalog: Catalog = [
            TranslationRecord::new("ui", "ok").with_value("en", "OK"),
            TranslationRecord::new("menu", "file").with_value("en", "File"),
        ]
        .into_iter()
        .collect();

        assert!(write_catalog(&path, &catalog, &langs(&["en"])).unwrap());
        assert!(!write_catalog(&path, &catalog, &langs(&["en"])).unwrap());
        assert_eq!(read_catalog(&path).unwrap(), catalog);
    }

    #[test]
    fn test_locale_entries_skip_incomplete_identity() {
        let catalog: Catalog = [
            TranslationRecord::new("ui", "ok").with_value("en", "OK"),
            TranslationRecord::new("", "orphan").with_value("en", "x"),
            TranslationRecord::new("menu", "file"),
        ]
        .into_iter()
        .collect();

        let entries = locale_entries(&catalog, "en");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["ui.ok"], "OK");
        assert_eq!(entries["menu.file"], "");
    }

    #[test]
    fn test_locale_entries_ignore_row_order() {
        let catalog: Catalog = [
            TranslationRecord::new("ui", "ok").with_value("en", "OK"),
            TranslationRecord::new("menu", "file").with_value("en", "File"),
        ]
        .into_iter()
        .collect();
        let reordered: Catalog = catalog.iter().rev().cloned().collect();

        let keys: Vec<_> = locale_entries(&catalog, "en").into_keys().collect();
        assert_eq!(keys, vec!["menu.file", "ui.ok"]);
        assert_eq!(locale_entries(&reordered, "en"), locale_entries(&catalog, "en"));
    }

    #[test]
    fn test_write_locales_reports_changes() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("locales");
        let catalog: Catalog = [TranslationRecord::new("ui", "ok")
            .with_value("en", "OK")
            .with_value("fr", "D'accord")]
        .into_iter()
        .collect();

        let files = write_locales(&dir, &catalog, &langs(&["en", "fr"])).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.changed && f.entries == 1));
        assert_eq!(
            fs::read_to_string(dir.join("fr.json")).unwrap(),
            "{\n  \"ui.ok\": \"D'accord\"\n}\n"
        );

        let again = write_locales(&dir, &catalog, &langs(&["en", "fr"])).unwrap();
        assert!(again.iter().all(|f| !f.changed));
    }
}
