//! Data directory access
//!
//! The data directory holds the upstream artifacts (daily stats, forecasts,
//! optimization outputs) and optionally a raw ledger that is priced live.

pub mod daily_stats;
pub mod forecast;
pub mod summary;

pub use daily_stats::{read_daily_stats_csv, write_daily_stats_csv};
pub use forecast::{ForecastKind, ForecastQuery, ForecastTable};
pub use summary::{build_summary, OptimizationSummary, SummaryResponse};

use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AppError;
use crate::ledger::{aggregate_daily, load_ledger, DailyStats};
use crate::pricing::CostModel;

pub const LEDGER_FILE: &str = "ledger.json";
pub const DAILY_STATS_FILE: &str = "daily_stats.csv";
pub const OPTIMIZATION_SUMMARY_FILE: &str = "optimization_summary.json";
pub const OPTIMIZATION_RESULTS_FILE: &str = "optimization_results.json";

/// Read-only view over the data directory
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Daily rows, priced live from the ledger when one exists
    ///
    /// Returns `Ok(None)` when neither the ledger nor `daily_stats.csv` is present.
    pub fn daily_stats(&self, model: &CostModel) -> Result<Option<Vec<DailyStats>>, AppError> {
        let ledger_path = self.path(LEDGER_FILE);
        if ledger_path.is_file() {
            debug!("Aggregating daily stats from ledger {:?}", ledger_path);
            let entries = load_ledger(&ledger_path)?;
            return Ok(Some(aggregate_daily(&entries, model)?));
        }

        let stats_path = self.path(DAILY_STATS_FILE);
        if stats_path.is_file() {
            return Ok(Some(read_daily_stats_csv(&stats_path)?));
        }

        Ok(None)
    }

    pub fn optimization_summary(&self) -> Result<Option<OptimizationSummary>, AppError> {
        let path = self.path(OPTIMIZATION_SUMMARY_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(read_json(&path)?))
    }

    pub fn has_optimization_results(&self) -> bool {
        self.path(OPTIMIZATION_RESULTS_FILE).is_file()
    }

    pub fn optimization_results(&self) -> Result<Option<Value>, AppError> {
        let path = self.path(OPTIMIZATION_RESULTS_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(read_json(&path)?))
    }

    pub fn forecast(&self, kind: ForecastKind) -> Result<Option<ForecastTable>, AppError> {
        let path = self.path(kind.file_name());
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(ForecastTable::from_path(&path)?))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{parse_price_sheet, FileFormat};

    fn model() -> CostModel {
        let sheet = parse_price_sheet(
            r#"{"lease_fee": {"standard": 2.0}, "exec_fee": {"standard": 0.5},
                "trigger_fee": 0.1, "acq_cost": 10.0, "transfer_fee": {"premium": 5.0}}"#,
            FileFormat::Json,
        )
        .unwrap();
        CostModel::new(sheet)
    }

    #[test]
    fn test_empty_dir_has_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        assert!(store.daily_stats(&model()).unwrap().is_none());
        assert!(store.optimization_summary().unwrap().is_none());
        assert!(store.optimization_results().unwrap().is_none());
        assert!(store.forecast(ForecastKind::Baseline).unwrap().is_none());
        assert!(!store.has_optimization_results());
    }

    #[test]
    fn test_ledger_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DAILY_STATS_FILE),
            "date,total_cost\n2024-05-01,999.0\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(LEDGER_FILE),
            r#"[{"date": "2024-05-01", "event": "lease", "category": "standard", "hours": 24, "blocks": 3}]"#,
        )
        .unwrap();

        let rows = DataStore::new(dir.path()).daily_stats(&model()).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].costs.total_cost, 144.0);
    }

    #[test]
    fn test_ledger_pricing_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(LEDGER_FILE),
            r#"[{"date": "2024-05-01", "event": "lease", "category": "premium"}]"#,
        )
        .unwrap();

        let err = DataStore::new(dir.path()).daily_stats(&model()).unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory(_)));
    }

    #[test]
    fn test_optimization_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(OPTIMIZATION_SUMMARY_FILE),
            r#"{"average_savings_percentage": 12.5}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(OPTIMIZATION_RESULTS_FILE),
            r#"{"strategy": "consolidate", "savings": [1, 2]}"#,
        )
        .unwrap();

        let store = DataStore::new(dir.path());
        let summary = store.optimization_summary().unwrap().unwrap();
        assert_eq!(summary.average_savings_percentage, 12.5);
        assert!(summary.recommendation.is_none());
        assert!(store.has_optimization_results());
        assert_eq!(
            store.optimization_results().unwrap().unwrap()["strategy"],
            "consolidate"
        );
    }
}
