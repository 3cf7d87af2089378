//! Domain entity definitions.

mod image_source;
mod request;
mod saved_image;

pub use image_source::{ImageSource, mime_for_path};
pub use request::{AspectRatio, ImageRequest, Resolution};
pub use saved_image::{SavedImage, unique_filename};
