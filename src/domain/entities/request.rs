//! Image request parameters.

use serde::{Deserialize, Serialize};

use super::image_source::ImageSource;

/// Aspect ratio accepted by the image model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 (default).
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape.
    #[serde(rename = "16:9")]
    Wide16x9,
    /// 9:16 portrait.
    #[serde(rename = "9:16")]
    Tall9x16,
    /// 4:3 landscape.
    #[serde(rename = "4:3")]
    Wide4x3,
    /// 3:4 portrait.
    #[serde(rename = "3:4")]
    Tall3x4,
    /// 2:1 landscape.
    #[serde(rename = "2:1")]
    Wide2x1,
    /// 1:2 portrait.
    #[serde(rename = "1:2")]
    Tall1x2,
    /// 19.5:9 landscape.
    #[serde(rename = "19.5:9")]
    Wide19p5x9,
    /// 9:19.5 portrait.
    #[serde(rename = "9:19.5")]
    Tall9x19p5,
    /// 20:9 landscape.
    #[serde(rename = "20:9")]
    Wide20x9,
    /// 9:20 portrait.
    #[serde(rename = "9:20")]
    Tall9x20,
    /// Model decides.
    #[serde(rename = "auto")]
    Auto,
}

impl AspectRatio {
    /// All accepted ratios, in wire order.
    pub const ALL: [Self; 12] = [
        Self::Square,
        Self::Wide16x9,
        Self::Tall9x16,
        Self::Wide4x3,
        Self::Tall3x4,
        Self::Wide2x1,
        Self::Tall1x2,
        Self::Wide19p5x9,
        Self::Tall9x19p5,
        Self::Wide20x9,
        Self::Tall9x20,
        Self::Auto,
    ];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Wide16x9 => "16:9",
            Self::Tall9x16 => "9:16",
            Self::Wide4x3 => "4:3",
            Self::Tall3x4 => "3:4",
            Self::Wide2x1 => "2:1",
            Self::Tall1x2 => "1:2",
            Self::Wide19p5x9 => "19.5:9",
            Self::Tall9x19p5 => "9:19.5",
            Self::Wide20x9 => "20:9",
            Self::Tall9x20 => "9:20",
            Self::Auto => "auto",
        }
    }

    /// Parses a wire string, returning None for anything outside the set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output resolution accepted by the image model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// 1k (default).
    #[default]
    #[serde(rename = "1k")]
    OneK,
    /// 2k.
    #[serde(rename = "2k")]
    TwoK,
}

impl Resolution {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneK => "1k",
            Self::TwoK => "2k",
        }
    }

    /// Parses a wire string, returning None for anything outside the set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1k" => Some(Self::OneK),
            "2k" => Some(Self::TwoK),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request for the image API.
///
/// The prompt is trimmed and guaranteed non-empty; the source is present
/// only for edit requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Trimmed, non-empty prompt text.
    pub prompt: String,
    /// Effective aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Effective resolution.
    pub resolution: Resolution,
    /// Source image for edit requests.
    pub source: Option<ImageSource>,
}

impl ImageRequest {
    /// Creates a generation request. Returns None if the prompt is blank.
    #[must_use]
    pub fn generation(
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution: Resolution,
    ) -> Option<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        Some(Self {
            prompt: prompt.to_string(),
            aspect_ratio,
            resolution,
            source: None,
        })
    }

    /// Creates an edit request. Returns None if the prompt is blank.
    #[must_use]
    pub fn edit(prompt: &str, source: ImageSource) -> Option<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        Some(Self {
            prompt: prompt.to_string(),
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            source: Some(source),
        })
    }
}
