use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics;

/// POST /api/optimize - Accept an optimization request
///
/// Optimization itself runs upstream; this acknowledges a non-empty request.
pub async fn optimize_blocks(body: Bytes) -> Result<Json<Value>, AppError> {
    metrics::record_request("/api/optimize");

    let request: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid JSON body: {}", e)))?
    };

    if is_empty_request(&request) {
        return Err(AppError::InvalidRequest("Request body is empty".to_string()));
    }

    info!("Optimization requested: {}", request);
    Ok(Json(json!({
        "message": "Optimization started in the background",
        "status": "completed",
    })))
}

fn is_empty_request(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// GET /api/optimization/status - Whether an optimization run has produced results
pub async fn get_optimization_status(State(state): State<AppState>) -> Json<Value> {
    metrics::record_request("/api/optimization/status");

    if state.data.has_optimization_results() {
        Json(json!({ "status": "completed" }))
    } else {
        Json(json!({ "status": "No optimization has been run yet" }))
    }
}

/// GET /api/optimization/results - Results of the most recent optimization run
pub async fn get_optimization_results(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    metrics::record_request("/api/optimization/results");

    state
        .data
        .optimization_results()?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Optimization results not found".to_string()))
}
