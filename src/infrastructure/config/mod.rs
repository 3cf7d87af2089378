//! Configuration loading and CLI argument handling.

mod args;
mod client_config;
mod storage;

pub use args::{CliArgs, Command};
pub use client_config::{AdvancedConfig, ClientConfig, LogLevel, NetworkConfig, StorageConfig};
pub use storage::{ConfigError, ConfigStore};
