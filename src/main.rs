use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use grok_image::application::{ImageCommandService, settings_summary};
use grok_image::infrastructure::{CliArgs, ClientConfig, Command, ConfigStore, GrokImageClient};

fn init_logging(config: &ClientConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<ClientConfig> {
    let store = ConfigStore::new()?;
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;
    info!(version = grok_image::VERSION, "Starting grok-image");

    if let Command::Info = args.command {
        println!("{}", settings_summary(&config));
        return Ok(());
    }

    let client = Arc::new(GrokImageClient::new(config)?);
    let service = ImageCommandService::new(client);

    let status = match &args.command {
        Command::Generate {
            prompt,
            aspect_ratio,
            resolution,
        } => {
            service
                .generate_image(prompt, aspect_ratio.as_deref(), resolution.as_deref())
                .await
        }
        Command::Edit { prompt, image } => service.edit_image(prompt, image).await,
        Command::Info => unreachable!("handled above"),
    };

    println!("{status}");

    service.shutdown().await;

    Ok(())
}
