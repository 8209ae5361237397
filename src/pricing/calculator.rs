use crate::ledger::BillingEvent;
use crate::pricing::error::CostError;
use crate::pricing::loader::{ensure_categories, load_price_sheet};
use crate::pricing::models::{CostBreakdown, FeeTable, PriceSheet};
use std::path::Path;

/// Lease duration billed when a lease omits its hours
pub const DEFAULT_LEASE_HOURS: i64 = 24;

/// Block count billed when a lease omits its block count
pub const DEFAULT_LEASE_BLOCKS: i64 = 1;

/// Fee calculator over an immutable price sheet
///
/// Every operation is a rate lookup times caller-supplied quantities.
/// Quantities are checked before the category lookup.
#[derive(Debug, Clone)]
pub struct CostModel {
    sheet: PriceSheet,
}

impl CostModel {
    /// Create a cost model from an already validated sheet
    pub fn new(sheet: PriceSheet) -> Self {
        Self { sheet }
    }

    /// Load a price sheet file and build a model from it
    pub fn from_path(path: &Path) -> Result<Self, CostError> {
        Ok(Self::new(load_price_sheet(path)?))
    }

    /// Load a price sheet file, requiring the given categories to be priced
    pub fn from_path_with_categories(path: &Path, expected: &[String]) -> Result<Self, CostError> {
        let sheet = load_price_sheet(path)?;
        ensure_categories(&sheet, expected)?;
        Ok(Self::new(sheet))
    }

    pub fn sheet(&self) -> &PriceSheet {
        &self.sheet
    }

    /// Cost of holding `blocks` blocks of `category` for `hours` hours
    pub fn lease(&self, category: &str, hours: i64, blocks: i64) -> Result<f64, CostError> {
        let hours = quantity("hours", hours)?;
        let blocks = quantity("blocks", blocks)?;
        finite("lease", self.rate(FeeTable::Lease, category)? * hours * blocks)
    }

    /// One block of `category` for a day
    pub fn lease_block_day(&self, category: &str) -> Result<f64, CostError> {
        self.lease(category, DEFAULT_LEASE_HOURS, DEFAULT_LEASE_BLOCKS)
    }

    /// Cost of executing `jobs` jobs on `category` blocks
    pub fn exec(&self, category: &str, jobs: i64) -> Result<f64, CostError> {
        let jobs = quantity("jobs", jobs)?;
        finite("exec", self.rate(FeeTable::Exec, category)? * jobs)
    }

    /// Cost of remotely triggering `jobs` jobs
    pub fn trigger(&self, jobs: i64) -> Result<f64, CostError> {
        finite("trigger", self.sheet.trigger_fee * quantity("jobs", jobs)?)
    }

    /// Cost of acquiring `blocks` new blocks
    pub fn acquisition(&self, blocks: i64) -> Result<f64, CostError> {
        finite("acquisition", self.sheet.acq_cost * quantity("blocks", blocks)?)
    }

    /// Cost of moving `blocks` blocks into `new_category`
    pub fn transfer(&self, new_category: &str, blocks: i64) -> Result<f64, CostError> {
        let blocks = quantity("blocks", blocks)?;
        finite("transfer", self.rate(FeeTable::Transfer, new_category)? * blocks)
    }

    /// Price a single billing event
    pub fn price(&self, event: &BillingEvent) -> Result<f64, CostError> {
        match event {
            BillingEvent::Lease {
                category,
                hours,
                blocks,
            } => self.lease(category, *hours, *blocks),
            BillingEvent::Exec { category, jobs } => self.exec(category, *jobs),
            BillingEvent::Trigger { jobs } => self.trigger(*jobs),
            BillingEvent::Acquisition { blocks } => self.acquisition(*blocks),
            BillingEvent::Transfer { category, blocks } => self.transfer(category, *blocks),
        }
    }

    /// Price a single event into the breakdown slot for its kind
    pub fn breakdown(&self, event: &BillingEvent) -> Result<CostBreakdown, CostError> {
        let cost = self.price(event)?;
        let mut breakdown = CostBreakdown::zero();
        match event {
            BillingEvent::Lease { .. } => breakdown.lease_cost = cost,
            BillingEvent::Exec { .. } => breakdown.exec_cost = cost,
            BillingEvent::Trigger { .. } => breakdown.trigger_cost = cost,
            BillingEvent::Acquisition { .. } => breakdown.acquisition_cost = cost,
            BillingEvent::Transfer { .. } => breakdown.transfer_cost = cost,
        }
        breakdown.calculate_total();
        Ok(breakdown)
    }

    fn rate(&self, table: FeeTable, category: &str) -> Result<f64, CostError> {
        self.sheet
            .table(table)
            .get(category)
            .copied()
            .ok_or_else(|| CostError::UnknownCategory {
                table,
                category: category.to_string(),
            })
    }
}

fn quantity(field: &'static str, value: i64) -> Result<f64, CostError> {
    if value < 0 {
        return Err(CostError::InvalidQuantity { field, value });
    }
    Ok(value as f64)
}

fn finite(field: &'static str, cost: f64) -> Result<f64, CostError> {
    if cost.is_finite() {
        Ok(cost)
    } else {
        Err(CostError::OutOfRange { field })
    }
}
