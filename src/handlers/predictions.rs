use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;

use crate::data::{ForecastKind, ForecastQuery};
use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics;

/// GET /api/predictions - Baseline usage and cost forecast
///
/// Example: GET /api/predictions?metric=total_cost&days=14
pub async fn get_predictions(
    State(state): State<AppState>,
    params: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    metrics::record_request("/api/predictions");
    let Query(params) = params?;
    query_forecast(&state, &params, ForecastKind::Baseline)
}

/// GET /api/optimized_predictions - Forecast after applying the optimization strategy
pub async fn get_optimized_predictions(
    State(state): State<AppState>,
    params: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    metrics::record_request("/api/optimized_predictions");
    let Query(params) = params?;
    query_forecast(&state, &params, ForecastKind::Optimized)
}

fn query_forecast(
    state: &AppState,
    params: &ForecastQuery,
    kind: ForecastKind,
) -> Result<Json<Value>, AppError> {
    let table = state
        .data
        .forecast(kind)?
        .ok_or_else(|| AppError::NotFound(format!("{} data not found", kind.label())))?;

    Ok(Json(table.query(params, kind)?))
}
