//! Saved image record and filename synthesis.

use std::path::PathBuf;

/// A generated or edited image persisted to the local save directory.
///
/// Created once per successful download; never mutated. Retention is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Remote URL the image was downloaded from.
    pub remote_url: String,
}

impl SavedImage {
    /// Creates a new record.
    #[must_use]
    pub fn new(path: PathBuf, remote_url: impl Into<String>) -> Self {
        Self {
            path,
            remote_url: remote_url.into(),
        }
    }
}

/// Synthesizes a unique filename: `{prefix}{yyyyMMdd_HHmmss}_{8-hex}{ext}`.
///
/// `ext` must include the leading dot.
#[must_use]
pub fn unique_filename(prefix: &str, ext: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let unique = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}{timestamp}_{}{ext}", &unique[..8])
}
