//! Image generation port definition.

use async_trait::async_trait;

use crate::domain::entities::SavedImage;
use crate::domain::errors::ImageError;

/// Port for image generation and editing operations.
///
/// Implementations must be safe to share across concurrent callers.
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    /// Generates an image from a prompt and persists it locally.
    ///
    /// Invalid `aspect_ratio`/`resolution` values fall back to configured
    /// defaults rather than failing the call.
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: Option<&str>,
        resolution: Option<&str>,
    ) -> Result<SavedImage, ImageError>;

    /// Edits an image (remote URL or local path) per the prompt and
    /// persists the result locally.
    async fn edit(&self, prompt: &str, image_source: &str) -> Result<SavedImage, ImageError>;

    /// Releases the transport session. Safe to call more than once.
    async fn shutdown(&self);
}
