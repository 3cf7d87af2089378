//! Application layer with command services.

/// Service implementations.
pub mod services;

pub use services::{ImageCommandService, first_image_source, settings_summary};
