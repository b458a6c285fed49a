mod app;
mod input;
mod prompt;
mod table;

use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};
use txplayers_core::AppConfig;

const LOG_FILE: &str = "txplayers.log";

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_err) = AppConfig::load_or_default();
    init_logging(&config.log_root())?;

    if let Some(err) = config_err {
        warn!("Using default settings: {err}");
    }
    info!(?config, "Starting txplayers");

    let mut app = app::PlayersApp::new(config);
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!("Exiting with error: {err:#}");
    }
    result
}

// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
