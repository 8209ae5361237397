pub mod calculator;
pub mod error;
pub mod loader;
pub mod models;
pub mod service;

pub use calculator::{CostModel, DEFAULT_LEASE_BLOCKS, DEFAULT_LEASE_HOURS};
pub use error::CostError;
pub use loader::{ensure_categories, load_price_sheet, parse_price_sheet, FileFormat};
pub use models::{CostBreakdown, FeeTable, PriceSheet};
pub use service::PricingService;
