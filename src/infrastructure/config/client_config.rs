//! Client configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AspectRatio, Resolution};

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "grok-image";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Immutable client configuration, created once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Grok API key. Empty disables all operations.
    #[serde(default)]
    pub api_key: String,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default aspect ratio for generation requests.
    #[serde(default)]
    pub default_aspect_ratio: AspectRatio,

    /// Default resolution for generation requests.
    #[serde(default)]
    pub default_resolution: Resolution,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Network settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            default_aspect_ratio: AspectRatio::default(),
            default_resolution: Resolution::default(),
            log_path: None,
            log_level: LogLevel::default(),
            network: NetworkConfig::default(),
            storage: StorageConfig::default(),
            advanced: AdvancedConfig::default(),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// HTTP proxy URL.
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// HTTPS proxy URL. Takes precedence over `http_proxy`.
    #[serde(default)]
    pub https_proxy: Option<String>,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where downloaded images are written.
    /// Defaults to the platform data directory when unset.
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    /// Prefix for generated filenames.
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_directory: None,
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// Advanced request settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// End-to-end deadline per call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum attempts per API call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.x.ai/v1".to_string()
}

fn default_filename_prefix() -> String {
    "grok_".to_string()
}

fn default_request_timeout() -> u64 {
    180
}

fn default_max_retries() -> u32 {
    3
}

impl ClientConfig {
    /// Returns the effective proxy URL: HTTPS proxy wins, then HTTP, else none.
    /// Ambient environment proxies are never consulted.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.network
            .https_proxy
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| {
                self.network
                    .http_proxy
                    .as_deref()
                    .filter(|p| !p.is_empty())
            })
    }

    /// Returns the effective save directory, falling back to the platform
    /// data directory (or a temp dir when that cannot be determined).
    #[must_use]
    pub fn effective_save_directory(&self) -> PathBuf {
        self.storage
            .save_directory
            .clone()
            .unwrap_or_else(default_save_directory)
    }

    /// Returns true when an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Returns the default image save directory.
fn default_save_directory() -> PathBuf {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
        || std::env::temp_dir().join(APP_NAME).join("images"),
        |dirs| dirs.data_dir().join("images"),
    )
}
