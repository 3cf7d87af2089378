//! Grok API wire types.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AspectRatio, Resolution};

/// Model identifier sent with every request.
pub const GROK_IMAGE_MODEL: &str = "grok-imagine-image";

/// Payload for `POST /images/generations`.
#[derive(Debug, Serialize)]
pub struct GenerationPayload<'a> {
    /// Model identifier.
    pub model: &'static str,
    /// Prompt text.
    pub prompt: &'a str,
    /// Aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Resolution.
    pub resolution: Resolution,
}

/// Payload for `POST /images/edits`.
#[derive(Debug, Serialize)]
pub struct EditPayload<'a> {
    /// Model identifier.
    pub model: &'static str,
    /// Prompt text.
    pub prompt: &'a str,
    /// Normalized source image reference.
    pub image: ImageRef,
}

/// Image reference fragment: `{"url": ..., "type": "image_url"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Remote URL or data URI.
    pub url: String,
    /// Always `image_url`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl ImageRef {
    /// Wraps a URL or data URI as an API image reference.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: "image_url".to_string(),
        }
    }
}

/// Response shape for both endpoints: `{"data": [{"url": ...}, ...]}`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    /// Generated image entries.
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

/// One generated image entry.
#[derive(Debug, Deserialize)]
pub struct ImageDatum {
    /// URL of the generated image.
    #[serde(default)]
    pub url: Option<String>,
}

impl ApiResponse {
    /// Returns the first non-empty image URL, if any.
    #[must_use]
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}
