//! Forecast tables (`future_predictions.csv`, `optimized_predictions.csv`)
//!
//! A table is a `date` column plus any number of metric columns. Queries
//! select a window of rows and optionally a single metric.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::Path;

use crate::error::AppError;

const DATE_COLUMN: &str = "date";
const STRATEGY_COLUMN: &str = "optimization_strategy";
const SAVINGS_COLUMN: &str = "estimated_savings";

/// Maximum forecast window in days
pub const MAX_FORECAST_DAYS: i64 = 365;

/// Which forecast a table holds; selects the response field names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastKind {
    Baseline,
    Optimized,
}

impl ForecastKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Baseline => "future_predictions.csv",
            Self::Optimized => "optimized_predictions.csv",
        }
    }

    fn values_field(&self) -> &'static str {
        match self {
            Self::Baseline => "predictions",
            Self::Optimized => "optimized_predictions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline => "Predictions",
            Self::Optimized => "Optimized predictions",
        }
    }
}

/// Query parameters for forecast endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastQuery {
    /// Single metric column to return
    pub metric: Option<String>,

    /// Number of rows to return (1..=365)
    #[serde(default = "default_days")]
    pub days: i64,

    /// Inclusive lower bound on `date`
    pub start_date: Option<String>,

    /// Inclusive upper bound on `date`
    pub end_date: Option<String>,
}

fn default_days() -> i64 {
    30
}

impl Default for ForecastQuery {
    fn default() -> Self {
        Self {
            metric: None,
            days: default_days(),
            start_date: None,
            end_date: None,
        }
    }
}

/// Parsed forecast table
#[derive(Debug, Clone)]
pub struct ForecastTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl ForecastTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if !columns.iter().any(|c| c == DATE_COLUMN) {
            return Err(anyhow!("forecast table missing '{}' column", DATE_COLUMN));
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row: Map<String, Value> = columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| {
                    let value = if column == DATE_COLUMN {
                        Value::String(cell.trim().to_string())
                    } else {
                        parse_cell(cell)
                    };
                    (column.clone(), value)
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open forecast file: {:?}", path))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to parse forecast file: {:?}", path))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Run a forecast query, producing the JSON response body
    pub fn query(&self, params: &ForecastQuery, kind: ForecastKind) -> Result<Value, AppError> {
        if params.days <= 0 || params.days > MAX_FORECAST_DAYS {
            return Err(AppError::InvalidParameter(format!(
                "Days parameter must be between 1 and {}",
                MAX_FORECAST_DAYS
            )));
        }

        let window: Vec<&Map<String, Value>> = self
            .rows
            .iter()
            .filter(|row| in_range(row, params))
            .take(params.days as usize)
            .collect();

        let dates: Vec<Value> = window
            .iter()
            .map(|row| row.get(DATE_COLUMN).cloned().unwrap_or(Value::Null))
            .collect();

        let mut result = Map::new();
        result.insert("dates".to_string(), Value::Array(dates));

        match &params.metric {
            Some(metric) => {
                if !self.has_column(metric) {
                    return Err(AppError::InvalidParameter(format!(
                        "Invalid metric. Available metrics: {:?}",
                        self.columns
                    )));
                }
                result.insert(
                    kind.values_field().to_string(),
                    Value::Array(column_values(&window, metric)),
                );

                let lower = format!("{}_lower_ci", metric);
                let upper = format!("{}_upper_ci", metric);
                if self.has_column(&lower) && self.has_column(&upper) {
                    result.insert(
                        "confidence_intervals".to_string(),
                        json!({
                            "lower": column_values(&window, &lower),
                            "upper": column_values(&window, &upper),
                        }),
                    );
                }
            }
            None => {
                let records: Vec<Value> =
                    window.iter().map(|row| Value::Object((*row).clone())).collect();
                result.insert(kind.values_field().to_string(), Value::Array(records));
            }
        }

        if kind == ForecastKind::Optimized && self.has_column(STRATEGY_COLUMN) {
            let strategy = window
                .first()
                .and_then(|row| row.get(STRATEGY_COLUMN).cloned())
                .unwrap_or(Value::Null);
            let estimated_savings = if self.has_column(SAVINGS_COLUMN) {
                mean(&window, SAVINGS_COLUMN).map_or(Value::Null, |m| json!(m))
            } else {
                Value::Null
            };
            result.insert(
                "optimization_details".to_string(),
                json!({
                    "strategy": strategy,
                    "estimated_savings": estimated_savings,
                }),
            );
        }

        Ok(Value::Object(result))
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

fn in_range(row: &Map<String, Value>, params: &ForecastQuery) -> bool {
    let date = row.get(DATE_COLUMN).and_then(Value::as_str).unwrap_or("");
    if let Some(start) = &params.start_date {
        if date < start.as_str() {
            return false;
        }
    }
    if let Some(end) = &params.end_date {
        if date > end.as_str() {
            return false;
        }
    }
    true
}

fn column_values(rows: &[&Map<String, Value>], column: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
        .collect()
}

fn mean(rows: &[&Map<String, Value>], column: &str) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(column).and_then(Value::as_f64))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn parse_cell(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return json!(n);
    }
    match cell.parse::<f64>() {
        Ok(n) if n.is_finite() => json!(n),
        _ => Value::String(cell.to_string()),
    }
}
