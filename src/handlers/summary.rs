use axum::{extract::State, Json};
use tracing::error;

use crate::data::{build_summary, SummaryResponse};
use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics;

/// GET /api/summary - Current block allocation and cost summary
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    metrics::record_request("/api/summary");

    let model = state.pricing.current();
    let rows = state.data.daily_stats(&model).map_err(|e| {
        error!("Error in summary endpoint: {}", e);
        e
    })?;
    let optimization = state.data.optimization_summary()?;

    match (rows, optimization) {
        (Some(rows), Some(optimization)) => Ok(Json(build_summary(&rows, &optimization))),
        _ => Err(AppError::NotFound("Required data files not found".to_string())),
    }
}
