//! Translation record model.
//!
//! A translation record is one row of the catalog: a category, a key and one
//! value per language tag. Records are identified by the composite
//! `(category, key)` pair, which is the only identity shared between the
//! local JSON file and the spreadsheet.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

/// JSON property holding the category in the local catalog file.
pub const CATEGORY_FIELD: &str = "cate";

/// JSON property holding the key in the local catalog file.
pub const KEY_FIELD: &str = "key";

/// Composite identity of a translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowKey {
    /// Category (namespace) of the entry, may be empty.
    pub category: String,
    /// Key within the category. Never empty for records that survive a read.
    pub key: String,
}

impl RowKey {
    /// Create a new composite key.
    pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
        }
    }

    /// Flattened `"{category}.{key}"` form used by the locale files.
    #[must_use]
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.category, self.key)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.category, self.key)
    }
}

/// A single translation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Category of the entry.
    pub category: String,

    /// Key of the entry within its category.
    pub key: String,

    /// Language tag (hyphenated, e.g. `zh-TW`) to translated text.
    pub values: BTreeMap<String, String>,
}

impl TranslationRecord {
    /// Create a record with no translations.
    pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for one language value.
    #[must_use]
    pub fn with_value(mut self, lang: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(lang.into(), value.into());
        self
    }

    /// Composite identity of this record.
    #[must_use]
    pub fn row_key(&self) -> RowKey {
        RowKey::new(self.category.clone(), self.key.clone())
    }

    /// Value for a language, empty when the language is absent.
    #[must_use]
    pub fn value(&self, lang: &str) -> &str {
        self.values.get(lang).map_or("", String::as_str)
    }

    /// Values for the given languages, in the given order.
    #[must_use]
    pub fn values_for(&self, langs: &[String]) -> Vec<String> {
        langs.iter().map(|lang| self.value(lang).to_string()).collect()
    }

    /// Whether the base language carries a non-empty value.
    #[must_use]
    pub fn has_value(&self, lang: &str) -> bool {
        !self.value(lang).is_empty()
    }
}

/// An ordered sequence of translation records.
///
/// Order is preserved exactly as read; identity uniqueness is not enforced
/// here (the CRUD boundary rejects duplicates before they are written).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<TranslationRecord>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in catalog order.
    #[must_use]
    pub fn records(&self) -> &[TranslationRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, TranslationRecord> {
        self.records.iter()
    }

    /// Append a record at the end.
    pub fn push(&mut self, record: TranslationRecord) {
        self.records.push(record);
    }

    /// Whether any record carries the given identity.
    #[must_use]
    pub fn contains(&self, key: &RowKey) -> bool {
        self.records
            .iter()
            .any(|r| r.category == key.category && r.key == key.key)
    }

    /// Remove every record with the given identity, returning how many went.
    pub fn remove(&mut self, key: &RowKey) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !(r.category == key.category && r.key == key.key));
        before - self.records.len()
    }

    /// Index records by composite key.
    ///
    /// Later records overwrite earlier ones with the same identity.
    #[must_use]
    pub fn index_by_key(&self) -> HashMap<RowKey, &TranslationRecord> {
        self.records.iter().map(|r| (r.row_key(), r)).collect()
    }
}

impl FromIterator<TranslationRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = TranslationRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Catalog {
    type Item = TranslationRecord;
    type IntoIter = std::vec::IntoIter<TranslationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TranslationRecord;
    type IntoIter = std::slice::Iter<'a, TranslationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
