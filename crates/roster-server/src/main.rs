//! # Roster Server
//!
//! Main entry point: loads configuration, installs logging, and runs the
//! HTTP server until shutdown.

use anyhow::Context;
use roster_config::ConfigLoader;
use roster_server::{app, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {:#}", e);
        eprintln!("Application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ConfigLoader::from_default_location()
        .load()
        .context("failed to load configuration")?;

    logging::init_logging(&config.observability).context("failed to initialize logging")?;

    info!("Starting Roster Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    app::run(config).await?;
    Ok(())
}
