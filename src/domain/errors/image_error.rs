//! Image client error types.

use thiserror::Error;

/// Failure taxonomy for image generation, editing, and persistence.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("invalid request: {message}")]
    Validation { message: String },

    #[error("unusable image source: {message}")]
    InputSource { message: String },

    #[error("Grok API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("transient transport error: {message}")]
    Transport { message: String },

    #[error("proxy connection failed, check proxy settings: {message}")]
    Proxy { message: String },

    #[error("request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("API response did not contain an image URL: {message}")]
    MalformedResponse { message: String },

    #[error("image download failed (HTTP {status}): {url}")]
    DownloadFailed { status: u16, url: String },

    #[error("failed to persist image: {message}")]
    Persistence { message: String },

    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl ImageError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an input source error.
    #[must_use]
    pub fn input_source(message: impl Into<String>) -> Self {
        Self::InputSource {
            message: message.into(),
        }
    }

    /// Creates a transient transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a proxy error.
    #[must_use]
    pub fn proxy(message: impl Into<String>) -> Self {
        Self::Proxy {
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a persistence error.
    #[must_use]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Creates an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the executor may retry after this error.
    ///
    /// Only transient transport faults and per-attempt timeouts qualify;
    /// everything else is definitive for the current call.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
