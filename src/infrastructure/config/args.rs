//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::client_config::{ClientConfig, LogLevel};

/// Command-line arguments. Values here override the configuration file.
#[derive(Debug, Parser)]
#[command(
    name = "grok-image",
    version,
    about = "Grok image generation and editing client",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Grok API key (overrides config file).
    #[arg(long, env = "GROK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// HTTPS proxy URL (overrides config file).
    #[arg(long, value_name = "URL")]
    pub https_proxy: Option<String>,

    /// HTTP proxy URL (overrides config file).
    #[arg(long, value_name = "URL")]
    pub http_proxy: Option<String>,

    /// Directory where downloaded images are written.
    #[arg(long, value_name = "PATH")]
    pub save_directory: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operation to perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate an image from a text prompt.
    Generate {
        /// Prompt text.
        prompt: String,

        /// Aspect ratio (e.g. 1:1, 16:9, auto). Invalid values fall back
        /// to the configured default.
        #[arg(long, value_name = "RATIO")]
        aspect_ratio: Option<String>,

        /// Resolution (1k or 2k). Invalid values fall back to the
        /// configured default.
        #[arg(long, value_name = "RES")]
        resolution: Option<String>,
    },

    /// Edit an existing image per a prompt.
    Edit {
        /// Edit prompt text.
        prompt: String,

        /// Source image: a URL or a local file path. May be repeated;
        /// the first usable source wins.
        #[arg(long, value_name = "URL_OR_PATH", required = true)]
        image: Vec<String>,
    },

    /// Print the effective settings.
    Info,
}

impl ClientConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(api_key) = &args.api_key {
            self.api_key.clone_from(api_key);
        }
        if let Some(https_proxy) = &args.https_proxy {
            self.network.https_proxy = Some(https_proxy.clone());
        }
        if let Some(http_proxy) = &args.http_proxy {
            self.network.http_proxy = Some(http_proxy.clone());
        }
        if let Some(save_directory) = &args.save_directory {
            self.storage.save_directory = Some(save_directory.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
    }
}
