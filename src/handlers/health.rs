use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::handlers::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "message": "Service is running",
    })))
}

/// Readiness check endpoint
/// Reports the price sheet currently serving quotes
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.pricing.current();
    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "qpu-billing",
        "version": env!("CARGO_PKG_VERSION"),
        "price_sheet_version": model.sheet().version,
    })))
}
