use anyhow::Result;
use colored::Colorize;
use qpu_billing::config;
use std::path::Path;
use tracing::info;

/// Execute the config show command
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file {:?}", config_path);

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Price Sheet: {}", cfg.pricing.sheet_path.display());
    println!(
        "  Expected Categories: {}",
        if cfg.pricing.expected_categories.is_empty() {
            "(any)".to_string()
        } else {
            cfg.pricing.expected_categories.join(", ")
        }
    );
    println!("  Data Dir: {}", cfg.data.dir.display());

    Ok(())
}
