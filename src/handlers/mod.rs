pub mod cost;
pub mod health;
pub mod metrics_handler;
pub mod optimization;
pub mod predictions;
pub mod summary;

use std::sync::Arc;

use crate::data::DataStore;
use crate::pricing::PricingService;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingService>,
    pub data: Arc<DataStore>,
}
