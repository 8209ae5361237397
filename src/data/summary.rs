use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::DailyStats;

const DEFAULT_RECOMMENDATION: &str = "No specific recommendation available";

/// Contents of `optimization_summary.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationSummary {
    #[serde(default)]
    pub average_savings_percentage: f64,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Allocation and cost summary served by `/api/summary`
///
/// Totals are rendered as strings to keep the wire format of the dashboard client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_blocks: String,
    pub blocks_by_type: BTreeMap<String, i64>,
    pub total_workloads: String,
    pub average_cost_per_day: String,
    pub cost_savings_percentage: i64,
    pub recommendation: String,
}

/// Build the summary from daily rows and the optimization summary
pub fn build_summary(rows: &[DailyStats], optimization: &OptimizationSummary) -> SummaryResponse {
    // counts from an uploaded artifact are unbounded; clamp instead of wrapping
    let total_blocks = rows
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.new_blocks_leased));
    let total_workloads = rows
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.workloads_executed));
    let average_cost_per_day = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| r.costs.total_cost).sum::<f64>() / rows.len() as f64
    };

    // latest day reflects the current allocation
    let blocks_by_type = rows
        .last()
        .map(|r| r.blocks_by_category.clone())
        .unwrap_or_default();

    SummaryResponse {
        total_blocks: total_blocks.to_string(),
        blocks_by_type,
        total_workloads: total_workloads.to_string(),
        average_cost_per_day: format_amount(average_cost_per_day),
        cost_savings_percentage: optimization.average_savings_percentage.trunc() as i64,
        recommendation: optimization
            .recommendation
            .clone()
            .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string()),
    }
}

/// Decimal rendering that always keeps a fractional part ("144.0", "12.5")
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
