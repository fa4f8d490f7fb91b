//! Data models for sheetsync.
//!
//! This module contains the domain models shared by the local file layer,
//! the spreadsheet layer and the diff engine:
//! - RowKey (composite `(category, key)` identity)
//! - TranslationRecord
//! - Catalog

pub mod record;

pub use record::{Catalog, RowKey, TranslationRecord, CATEGORY_FIELD, KEY_FIELD};
