//! Live cost endpoints
//!
//! These price events through the current `CostModel` instead of reading
//! precomputed artifacts.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::ledger::{aggregate_by_workload, aggregate_daily, BillingEvent, DailyStats, LedgerEntry};
use crate::metrics;
use crate::pricing::{CostBreakdown, CostError, PriceSheet};

/// Quote request body: a single event or a list of events
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuoteRequest {
    Many(Vec<BillingEvent>),
    One(BillingEvent),
}

impl QuoteRequest {
    fn into_events(self) -> Vec<BillingEvent> {
        match self {
            Self::Many(events) => events,
            Self::One(event) => vec![event],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuoteItem {
    #[serde(flatten)]
    pub event: BillingEvent,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub price_sheet_version: Option<String>,
    pub items: Vec<QuoteItem>,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Serialize)]
pub struct DailyCostResponse {
    pub days: Vec<DailyStats>,
    pub by_workload: BTreeMap<String, CostBreakdown>,
}

/// GET /api/price-sheet - The price sheet currently in effect
pub async fn get_price_sheet(State(state): State<AppState>) -> Json<PriceSheet> {
    metrics::record_request("/api/price-sheet");
    Json(state.pricing.current().sheet().clone())
}

/// POST /api/cost/quote - Price one or more billing events
///
/// Example:
/// ```json
/// [
///   {"event": "lease", "category": "standard", "hours": 24, "blocks": 3},
///   {"event": "trigger", "jobs": 10}
/// ]
/// ```
pub async fn quote(
    State(state): State<AppState>,
    request: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let started = Instant::now();
    metrics::record_request("/api/cost/quote");
    let Json(request) = request?;

    let model = state.pricing.current();
    let mut breakdown = CostBreakdown::zero();
    let mut items = Vec::new();

    for event in request.into_events() {
        let cost = model.breakdown(&event)?;
        metrics::record_fee(event.kind(), cost.total_cost);
        breakdown.merge(&cost);
        if !breakdown.total_cost.is_finite() {
            return Err(CostError::OutOfRange { field: "total_cost" }.into());
        }
        items.push(QuoteItem {
            event,
            cost: cost.total_cost,
        });
    }

    metrics::record_duration("/api/cost/quote", started.elapsed());
    Ok(Json(QuoteResponse {
        price_sheet_version: model.sheet().version.clone(),
        items,
        breakdown,
    }))
}

/// POST /api/cost/daily - Aggregate ledger entries into daily and per-workload totals
pub async fn daily_costs(
    State(state): State<AppState>,
    entries: Result<Json<Vec<LedgerEntry>>, JsonRejection>,
) -> Result<Json<DailyCostResponse>, AppError> {
    metrics::record_request("/api/cost/daily");
    let Json(entries) = entries?;

    let model = state.pricing.current();
    let days = aggregate_daily(&entries, &model)?;
    let by_workload = aggregate_by_workload(&entries, &model)?;

    Ok(Json(DailyCostResponse { days, by_workload }))
}
