//! Image command service.
//!
//! Outermost request handler: every failure from the port is converted to
//! a human-readable status string for the hosting integration, never
//! propagated as a crash.

use std::sync::Arc;

use tracing::error;

use crate::domain::errors::ImageError;
use crate::domain::ports::ImageGenerationPort;
use crate::infrastructure::config::ClientConfig;

/// Maps image generation results to status text for the caller.
pub struct ImageCommandService {
    port: Arc<dyn ImageGenerationPort>,
}

impl ImageCommandService {
    /// Creates a service over an image generation port.
    #[must_use]
    pub fn new(port: Arc<dyn ImageGenerationPort>) -> Self {
        Self { port }
    }

    /// Generates an image and reports the saved path or a failure message.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: Option<&str>,
        resolution: Option<&str>,
    ) -> String {
        match self.port.generate(prompt, aspect_ratio, resolution).await {
            Ok(saved) => format!(
                "Image generated successfully. Saved to: {}",
                saved.path.display()
            ),
            Err(e) => failure_text("Image generation", &e),
        }
    }

    /// Edits an image and reports the saved path or a failure message.
    ///
    /// The first non-empty source from `sources` is used.
    pub async fn edit_image(&self, prompt: &str, sources: &[String]) -> String {
        let Some(source) = first_image_source(sources) else {
            return "Image edit failed: no source image was provided".to_string();
        };

        match self.port.edit(prompt, source).await {
            Ok(saved) => format!(
                "Image edited successfully. Saved to: {}",
                saved.path.display()
            ),
            Err(e) => failure_text("Image edit", &e),
        }
    }

    /// Releases the underlying transport.
    pub async fn shutdown(&self) {
        self.port.shutdown().await;
    }
}

/// Picks the first non-empty image source from a candidate list.
#[must_use]
pub fn first_image_source(sources: &[String]) -> Option<&str> {
    sources
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

/// Summarizes the effective settings for display.
#[must_use]
pub fn settings_summary(config: &ClientConfig) -> String {
    format!(
        "Grok image settings\n\
         - API key configured: {}\n\
         - Proxy: {}\n\
         - Save directory: {}\n\
         - Filename prefix: {}\n\
         - Request timeout: {}s\n\
         - Max retries: {}\n\
         - Default aspect ratio: {}\n\
         - Default resolution: {}",
        if config.has_api_key() { "yes" } else { "no" },
        config.proxy().unwrap_or("none"),
        config.effective_save_directory().display(),
        config.storage.filename_prefix,
        config.advanced.request_timeout_secs,
        config.advanced.max_retries,
        config.default_aspect_ratio,
        config.default_resolution,
    )
}

fn failure_text(action: &str, e: &ImageError) -> String {
    error!(error = %e, "{action} failed");

    // Download failures still carry the remote URL in the message so the
    // caller can fetch the image manually.
    match e {
        ImageError::Timeout { seconds } => format!(
            "{action} timed out after {seconds}s. The Grok API can be slow; please retry."
        ),
        _ => format!("{action} failed: {e}"),
    }
}
