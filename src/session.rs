//! Persistence for the operator's in-progress item collection.
//!
//! The session file holds the editing state between runs (merge groups,
//! selection flags, attachments not yet submitted). The store stays the
//! system of record for submitted requests.

use crate::error::{Error, Result};
use crate::types::PaymentItem;
use std::fs;
use std::path::Path;

/// Load the item collection from disk.
///
/// Returns an empty collection if the file doesn't exist.
pub fn load_session(path: &Path) -> Result<Vec<PaymentItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Session(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Session(format!("failed to parse {}: {e}", path.display())))
}

/// Save the item collection to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_session(path: &Path, items: &[PaymentItem]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| Error::Session(format!("failed to create {}: {e}", dir.display())))?;
        }
    }

    let content = serde_json::to_string_pretty(items)
        .map_err(|e| Error::Session(format!("failed to serialize session: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Session(format!("failed to write {}: {e}", path.display())))
}
