use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub data: DataConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Price sheet document (YAML, TOML or JSON)
    pub sheet_path: PathBuf,
    /// Categories that must have lease and exec rates
    #[serde(default)]
    pub expected_categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding ledger and precomputed artifacts
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

/// Load the service configuration from a TOML file plus `QPU_BILLING__*` environment overrides
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("QPU_BILLING").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.host.is_empty() {
        anyhow::bail!("Server host cannot be empty");
    }

    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    match cfg.server.log_format.as_str() {
        "json" | "text" => {}
        other => anyhow::bail!("Invalid log format '{}' (expected 'json' or 'text')", other),
    }

    if cfg.pricing.sheet_path.as_os_str().is_empty() {
        anyhow::bail!("Price sheet path cannot be empty");
    }

    for category in &cfg.pricing.expected_categories {
        if category.trim().is_empty() {
            anyhow::bail!("Expected category names cannot be empty");
        }
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!(
            "Metrics endpoint '{}' must start with '/'",
            cfg.metrics.endpoint
        );
    }

    Ok(())
}
