//! Infrastructure layer with external service adapters.

/// Client configuration.
pub mod config;
/// Grok API client.
pub mod grok;
/// Image normalization and persistence.
pub mod image;

pub use config::{CliArgs, ClientConfig, Command, ConfigStore, LogLevel};
pub use grok::{GrokImageClient, RequestExecutor, TransportManager, TransportSession};
pub use image::{ImageSaver, extension_for_content_type, normalize};
