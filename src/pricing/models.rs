use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Price sheet for QPU block billing
///
/// Rates are keyed by block category (e.g. "standard", "premium").
/// The sheet is immutable once loaded; a new sheet means a new `CostModel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSheet {
    /// Per-hour, per-block lease rate by category
    pub lease_fee: BTreeMap<String, f64>,
    /// Per-job execution rate by category
    pub exec_fee: BTreeMap<String, f64>,
    /// Per-job remote trigger fee
    pub trigger_fee: f64,
    /// Flat fee per acquired block
    pub acq_cost: f64,
    /// Per-block fee to move a block into the keyed category
    pub transfer_fee: BTreeMap<String, f64>,
    /// Optional revision label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Category-keyed rate tables in a price sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTable {
    Lease,
    Exec,
    Transfer,
}

impl FeeTable {
    /// Field name of the table in the price sheet document
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Lease => "lease_fee",
            Self::Exec => "exec_fee",
            Self::Transfer => "transfer_fee",
        }
    }
}

impl fmt::Display for FeeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl PriceSheet {
    /// Rate table for a category-keyed fee
    pub fn table(&self, table: FeeTable) -> &BTreeMap<String, f64> {
        match table {
            FeeTable::Lease => &self.lease_fee,
            FeeTable::Exec => &self.exec_fee,
            FeeTable::Transfer => &self.transfer_fee,
        }
    }
}

/// Cost breakdown by billing event kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub lease_cost: f64,
    pub exec_cost: f64,
    pub trigger_cost: f64,
    pub acquisition_cost: f64,
    pub transfer_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    /// Create a zero-cost breakdown
    pub fn zero() -> Self {
        Self::default()
    }

    /// Calculate total cost from components
    pub fn calculate_total(&mut self) {
        self.total_cost = self.lease_cost
            + self.exec_cost
            + self.trigger_cost
            + self.acquisition_cost
            + self.transfer_cost;
    }

    /// Fold another breakdown into this one
    pub fn merge(&mut self, other: &CostBreakdown) {
        self.lease_cost += other.lease_cost;
        self.exec_cost += other.exec_cost;
        self.trigger_cost += other.trigger_cost;
        self.acquisition_cost += other.acquisition_cost;
        self.transfer_cost += other.transfer_cost;
        self.calculate_total();
    }
}
