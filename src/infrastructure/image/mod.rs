//! Image source normalization and result persistence.

mod normalizer;
mod saver;

pub use normalizer::normalize;
pub use saver::{DOWNLOAD_TIMEOUT, ImageSaver, extension_for_content_type};
