//! Port definitions.

mod image_generation_port;

pub use image_generation_port::ImageGenerationPort;
