//! grok-image - a Grok image generation and editing client.
//!
//! This crate wraps the Grok image HTTP API behind a small client with
//! pooled transport, proxy support, bounded retries with exponential
//! backoff, and local persistence of generated images.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing command services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "grok-image";
