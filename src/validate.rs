//! Input validation for records entered on the command line.
//!
//! Language tags are matched in three tiers: exact match → match ignoring
//! case and hyphens (`zhTW` → `zh-TW`) → error with the closest suggestion.

use crate::config::SheetConfig;
use crate::error::{Error, Result};
use crate::model::TranslationRecord;

/// Check that both parts of a record identity are present.
///
/// # Errors
///
/// Returns `Error::RequiredField` naming the first empty part.
pub fn validate_identity(category: &str, key: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::RequiredField("cate".to_string()));
    }
    if key.trim().is_empty() {
        return Err(Error::RequiredField("key".to_string()));
    }
    Ok(())
}

/// Split a `lang=text` assignment at the first `=`.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if there is no `=` or no language.
pub fn parse_value_assignment(input: &str) -> Result<(String, String)> {
    match input.split_once('=') {
        Some((lang, text)) if !lang.trim().is_empty() => Ok((lang.trim().to_string(), text.to_string())),
        _ => Err(Error::InvalidArgument(format!(
            "expected LANG=TEXT, got \"{input}\""
        ))),
    }
}

fn fold(tag: &str) -> String {
    tag.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a user-supplied language name onto a configured tag.
///
/// Returns the configured tag, or an error with the input and an optional
/// suggestion.
pub fn normalize_lang(input: &str, langs: &[String]) -> std::result::Result<String, (String, Option<String>)> {
    // Tier 1: exact match
    if let Some(lang) = langs.iter().find(|l| *l == input) {
        return Ok(lang.clone());
    }

    // Tier 2: ignore case and separators
    let folded = fold(input);
    if let Some(lang) = langs.iter().find(|l| fold(l) == folded) {
        return Ok(lang.clone());
    }

    // Tier 3: closest suggestion
    let suggestion = find_similar(input, langs, 1).into_iter().next();
    Err((input.to_string(), suggestion))
}

/// Build a record from command-line parts.
///
/// Every configured language is present in the result, empty when not
/// assigned.
///
/// # Errors
///
/// Returns `Error::RequiredField` if the category, the key or the base
/// language value is empty, and `Error::InvalidArgument` for malformed
/// assignments or unknown languages.
pub fn build_record(
    category: &str,
    key: &str,
    assignments: &[String],
    config: &SheetConfig,
) -> Result<TranslationRecord> {
    validate_identity(category, key)?;

    let mut record = TranslationRecord::new(category.trim(), key.trim());
    for lang in &config.langs {
        record.values.insert(lang.clone(), String::new());
    }

    for assignment in assignments {
        let (lang, text) = parse_value_assignment(assignment)?;
        let lang = normalize_lang(&lang, &config.langs).map_err(|(input, suggestion)| {
            let mut message = format!(
                "unknown language \"{input}\" (configured: {})",
                config.langs.join(", ")
            );
            if let Some(s) = suggestion {
                message.push_str(&format!("; did you mean \"{s}\"?"));
            }
            Error::InvalidArgument(message)
        })?;
        record.values.insert(lang, text);
    }

    if !record.has_value(&config.base_lang) {
        return Err(Error::RequiredField(config.base_lang.clone()));
    }

    Ok(record)
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find candidates similar to `searched`.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
#[must_use]
pub fn find_similar(searched: &str, candidates: &[String], max: usize) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = candidates
        .iter()
        .map(|c| (levenshtein_distance(searched, c), c.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    scored
        .into_iter()
        .take(max)
        .map(|(_, c)| c.to_string())
        .collect()
}
