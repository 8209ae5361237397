use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    data::DataStore,
    handlers::{self, AppState},
    metrics,
    pricing::PricingService,
    signals::setup_signal_handlers,
};

/// Request bodies are small JSON documents (quotes, ledgers)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the billing API server
///
/// This function:
/// 1. Loads the price sheet
/// 2. Initializes metrics (if enabled)
/// 3. Sets up signal handlers for graceful shutdown and price sheet reload
/// 4. Binds to the configured address and serves until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let pricing = Arc::new(PricingService::load(
        &config.pricing.sheet_path,
        config.pricing.expected_categories.clone(),
    )?);
    let data = Arc::new(DataStore::new(&config.data.dir));

    let (shutdown_tx, signal_handle) = setup_signal_handlers(pricing.clone());
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState {
        pricing: pricing.clone(),
        data,
    };

    let mut app = create_router(state);
    if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        let handle = Arc::new(metrics::init_metrics()?);
        app = app.merge(metrics_router(&config.metrics.endpoint, handle));
    }

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting QPU billing service on {}", addr);
    info!(
        "Configuration: price sheet {} ({}), data dir {}",
        pricing.sheet_path().display(),
        pricing
            .current()
            .sheet()
            .version
            .as_deref()
            .unwrap_or("unversioned"),
        config.data.dir.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the API router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/summary", get(handlers::summary::get_summary))
        .route("/api/predictions", get(handlers::predictions::get_predictions))
        .route(
            "/api/optimized_predictions",
            get(handlers::predictions::get_optimized_predictions),
        )
        .route("/api/optimize", post(handlers::optimization::optimize_blocks))
        .route(
            "/api/optimization/status",
            get(handlers::optimization::get_optimization_status),
        )
        .route(
            "/api/optimization/results",
            get(handlers::optimization::get_optimization_results),
        )
        .route("/api/price-sheet", get(handlers::cost::get_price_sheet))
        .route("/api/cost/quote", post(handlers::cost::quote))
        .route("/api/cost/daily", post(handlers::cost::daily_costs))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn metrics_router(endpoint: &str, handle: Arc<PrometheusHandle>) -> Router {
    Router::new()
        .route(endpoint, get(handlers::metrics_handler::render_metrics))
        .with_state(handle)
}
