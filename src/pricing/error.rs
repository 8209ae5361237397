use thiserror::Error;

use crate::pricing::models::FeeTable;

/// Errors raised while loading a price sheet or computing a fee
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// Price sheet missing, unreadable, or structurally invalid
    #[error("failed to load price sheet from {source_name}: {reason}")]
    ConfigLoad { source_name: String, reason: String },

    /// Category absent from the rate table consulted
    #[error("unknown category '{category}' in {table}")]
    UnknownCategory { table: FeeTable, category: String },

    /// Negative count or duration passed to a fee function
    #[error("invalid quantity for {field}: {value} (must be >= 0)")]
    InvalidQuantity { field: &'static str, value: i64 },

    /// A fee or an aggregated count does not fit the numeric range
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
}

impl CostError {
    pub(crate) fn config_load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConfigLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable kind, used for metrics labels and API error types
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigLoad { .. } => "config_load_error",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}
