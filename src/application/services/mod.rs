//! Application service implementations.

/// Image command handling.
pub mod image_command_service;

pub use image_command_service::{ImageCommandService, first_image_source, settings_summary};
