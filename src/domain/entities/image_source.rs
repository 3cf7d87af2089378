//! Image source value object.

use std::path::{Path, PathBuf};

/// A caller-supplied image reference, classified as remote or local.
///
/// Classification is purely syntactic: a string is a local path iff it
/// starts with `/` or `\`, or carries a drive-letter pattern (`X:`).
/// No filesystem access is needed to classify, only to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A remote URL, used as-is in the API payload.
    Remote(String),
    /// A local filesystem path, read and embedded as a base64 data URI.
    Local(PathBuf),
}

impl ImageSource {
    /// Classifies a raw image reference as local or remote.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if is_local_path(raw) {
            Self::Local(PathBuf::from(raw))
        } else {
            Self::Remote(raw.to_string())
        }
    }

    /// Returns true if this source is a local path.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Syntactic local-path check: absolute unix/windows path or drive letter.
fn is_local_path(raw: &str) -> bool {
    raw.starts_with('/') || raw.starts_with('\\') || raw.chars().nth(1) == Some(':')
}

/// Derives a MIME type from a file extension.
///
/// Unrecognized extensions default to `image/jpeg`.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}
