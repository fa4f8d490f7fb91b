//! Content hashing for written files.
//!
//! Downloads rewrite every output file from the sheet. Hashing the rendered
//! content against what is already on disk tells us whether a file actually
//! changed, and lets unchanged files keep their modification time.

use sha2::{Digest, Sha256};

/// SHA256 of a byte string, as 64 lowercase hex characters.
#[must_use]
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Check if content differs from what was stored.
///
/// Returns `true` if there is no stored hash (file did not exist) or the
/// hashes differ.
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.is_none_or(|h| h != current_hash)
}
