use anyhow::Result;
use colored::Colorize;
use qpu_billing::{init_tracing, server};
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the start command
///
/// Tracing is initialized here, after the configuration is loaded, so the
/// configured log level and format apply.
pub async fn execute(config_path: &Path, price_sheet: Option<PathBuf>) -> Result<()> {
    let cfg = super::load_config(config_path, price_sheet)?;
    init_tracing(&cfg.server.log_level, cfg.server.log_format == "json");

    println!("{}", "Starting QPU billing service...".green());
    info!("Loaded configuration from {:?}", config_path);

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
