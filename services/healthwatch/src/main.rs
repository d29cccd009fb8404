//! Healthwatch CLI
//!
//! Polls a backend health endpoint and serves the results as JSON.

use std::path::PathBuf;

use clap::Parser;
use healthwatch::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "healthwatch")]
#[command(about = "Adaptive backend health polling service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Health endpoint URL (overrides config file and environment)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, endpoint={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.endpoint,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_process_env();

    if let Some(endpoint) = args.endpoint {
        config.probe.endpoint_url = endpoint;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting healthwatch service");
    tracing::debug!(
        "Polling: {:?}, dashboard: {:?}, ui_enabled: {}",
        config.polling,
        config.dashboard,
        config.ui_enabled
    );

    healthwatch::run(config).await?;

    Ok(())
}
