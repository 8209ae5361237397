//! Billing ledger and aggregation
//!
//! A ledger is a list of dated billing events. Aggregation prices every
//! entry through the `CostModel` and folds the results per day or per workload.

pub mod aggregate;
pub mod event;

pub use aggregate::{aggregate_by_workload, aggregate_daily, total_cost, DailyStats, UNASSIGNED_WORKLOAD};
pub use event::{load_ledger, BillingEvent, LedgerEntry};
