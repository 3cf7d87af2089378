//! Grok API client: transport, request execution, and wire types.

mod client;
mod dto;
mod executor;
mod transport;

pub use client::GrokImageClient;
pub use dto::{ApiResponse, EditPayload, GROK_IMAGE_MODEL, GenerationPayload, ImageDatum, ImageRef};
pub use executor::{RequestExecutor, backoff_delay};
pub use transport::{TCP_CONNECT_TIMEOUT, TCP_TOTAL_TIMEOUT, TransportManager, TransportSession};
