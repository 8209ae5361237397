//! Command implementations for the CLI
//!
//! - start: Start the billing API server
//! - reload: Reload the price sheet of a running server
//! - test: Test configuration and price sheet validity
//! - config: Configuration display and validation
//! - quote: Price a single billing event
//! - report: Aggregate a ledger into daily cost rows

pub mod config;
pub mod quote;
pub mod reload;
pub mod report;
pub mod start;
pub mod test;

use anyhow::Result;
use qpu_billing::config::Config;
use std::path::{Path, PathBuf};

/// Load the service configuration, letting `--price-sheet` replace `pricing.sheet_path`
pub fn load_config(config_path: &Path, price_sheet: Option<PathBuf>) -> Result<Config> {
    let mut cfg = qpu_billing::config::load_config(config_path)?;
    if let Some(path) = price_sheet {
        cfg.pricing.sheet_path = path;
    }
    Ok(cfg)
}

/// Price sheet used by offline commands
///
/// An explicit `--price-sheet` wins; otherwise the configured
/// `pricing.sheet_path` is used.
pub fn resolve_sheet_path(price_sheet: Option<PathBuf>, config_path: &Path) -> Result<PathBuf> {
    match price_sheet {
        Some(path) => Ok(path),
        None => Ok(qpu_billing::config::load_config(config_path)?
            .pricing
            .sheet_path),
    }
}
