//! Image source normalization.
//!
//! Turns a caller-supplied image reference into an API-ready fragment:
//! remote URLs pass through verbatim, local files are read and embedded
//! as `data:<mime>;base64,<data>` URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::fs;
use tracing::debug;

use crate::domain::entities::{ImageSource, mime_for_path};
use crate::domain::errors::ImageError;
use crate::infrastructure::grok::ImageRef;

/// Normalizes an image source into an API image reference.
///
/// # Errors
/// Returns `InputSource` when a local file is missing or unreadable.
pub async fn normalize(source: &ImageSource) -> Result<ImageRef, ImageError> {
    match source {
        ImageSource::Remote(url) => Ok(ImageRef::new(url.clone())),
        ImageSource::Local(path) => {
            if !fs::try_exists(&path).await.unwrap_or(false) {
                return Err(ImageError::input_source(format!(
                    "file not found: {}",
                    path.display()
                )));
            }

            let bytes = fs::read(path).await.map_err(|e| {
                ImageError::input_source(format!("failed to read {}: {e}", path.display()))
            })?;

            let mime = mime_for_path(path);
            let data_uri = format!("data:{mime};base64,{}", BASE64.encode(&bytes));

            debug!(
                path = %path.display(),
                mime,
                size = bytes.len(),
                "Encoded local file as data URI"
            );

            Ok(ImageRef::new(data_uri))
        }
    }
}
