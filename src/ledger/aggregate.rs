use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::ledger::event::{BillingEvent, LedgerEntry};
use crate::pricing::{CostBreakdown, CostError, CostModel};

/// Workload name used for ledger entries without one
pub const UNASSIGNED_WORKLOAD: &str = "unassigned";

/// Per-day usage and cost totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub new_blocks_leased: i64,
    pub workloads_executed: i64,
    pub blocks_by_category: BTreeMap<String, i64>,
    #[serde(flatten)]
    pub costs: CostBreakdown,
}

impl DailyStats {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    fn record(&mut self, event: &BillingEvent, cost: &CostBreakdown) -> Result<(), CostError> {
        match event {
            BillingEvent::Lease {
                category, blocks, ..
            }
            | BillingEvent::Transfer { category, blocks } => {
                let count = self.blocks_by_category.entry(category.clone()).or_insert(0);
                *count = checked_sum("blocks_by_category", *count, *blocks)?;
            }
            BillingEvent::Exec { jobs, .. } => {
                self.workloads_executed =
                    checked_sum("workloads_executed", self.workloads_executed, *jobs)?;
            }
            BillingEvent::Acquisition { blocks } => {
                self.new_blocks_leased =
                    checked_sum("new_blocks_leased", self.new_blocks_leased, *blocks)?;
            }
            BillingEvent::Trigger { .. } => {}
        }
        self.costs.merge(cost);
        ensure_finite_total(&self.costs)
    }
}

fn checked_sum(field: &'static str, total: i64, amount: i64) -> Result<i64, CostError> {
    total
        .checked_add(amount)
        .ok_or(CostError::OutOfRange { field })
}

fn ensure_finite_total(costs: &CostBreakdown) -> Result<(), CostError> {
    if costs.total_cost.is_finite() {
        Ok(())
    } else {
        Err(CostError::OutOfRange { field: "total_cost" })
    }
}

/// Fold a ledger into one row per date, ascending
///
/// Each entry is priced through the cost model; the first pricing error is returned.
pub fn aggregate_daily(
    entries: &[LedgerEntry],
    model: &CostModel,
) -> Result<Vec<DailyStats>, CostError> {
    let mut days: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();

    for entry in entries {
        let cost = model.breakdown(&entry.event)?;
        days.entry(entry.date)
            .or_insert_with(|| DailyStats::empty(entry.date))
            .record(&entry.event, &cost)?;
    }

    debug!("Aggregated {} ledger entries into {} days", entries.len(), days.len());
    Ok(days.into_values().collect())
}

/// Total cost per workload
pub fn aggregate_by_workload(
    entries: &[LedgerEntry],
    model: &CostModel,
) -> Result<BTreeMap<String, CostBreakdown>, CostError> {
    let mut workloads: BTreeMap<String, CostBreakdown> = BTreeMap::new();

    for entry in entries {
        let cost = model.breakdown(&entry.event)?;
        let name = entry.workload.as_deref().unwrap_or(UNASSIGNED_WORKLOAD);
        let total = workloads.entry(name.to_string()).or_default();
        total.merge(&cost);
        ensure_finite_total(total)?;
    }

    Ok(workloads)
}

/// Total cost of a sequence of events
pub fn total_cost<'a>(
    events: impl IntoIterator<Item = &'a BillingEvent>,
    model: &CostModel,
) -> Result<CostBreakdown, CostError> {
    let mut total = CostBreakdown::zero();
    for event in events {
        total.merge(&model.breakdown(event)?);
        ensure_finite_total(&total)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceSheet;

    fn model() -> CostModel {
        CostModel::new(PriceSheet {
            lease_fee: BTreeMap::from([
                ("standard".to_string(), 2.0),
                ("premium".to_string(), 4.0),
            ]),
            exec_fee: BTreeMap::from([
                ("standard".to_string(), 0.5),
                ("premium".to_string(), 1.0),
            ]),
            trigger_fee: 0.25,
            acq_cost: 10.0,
            transfer_fee: BTreeMap::from([("premium".to_string(), 5.0)]),
            version: None,
        })
    }

    fn entry(date: &str, workload: Option<&str>, event: BillingEvent) -> LedgerEntry {
        LedgerEntry {
            date: date.parse().unwrap(),
            workload: workload.map(str::to_string),
            event,
        }
    }

    fn sample_ledger() -> Vec<LedgerEntry> {
        vec![
            entry("2024-05-02", Some("qaoa"), BillingEvent::Exec {
                category: "premium".to_string(),
                jobs: 4,
            }),
            entry("2024-05-01", None, BillingEvent::Acquisition { blocks: 3 }),
            entry("2024-05-01", Some("vqe"), BillingEvent::Lease {
                category: "standard".to_string(),
                hours: 24,
                blocks: 3,
            }),
            entry("2024-05-01", Some("vqe"), BillingEvent::Exec {
                category: "standard".to_string(),
                jobs: 10,
            }),
            entry("2024-05-01", Some("vqe"), BillingEvent::Trigger { jobs: 10 }),
            entry("2024-05-02", Some("qaoa"), BillingEvent::Transfer {
                category: "premium".to_string(),
                blocks: 1,
            }),
        ]
    }

    #[test]
    fn test_aggregate_daily() {
        let rows = aggregate_daily(&sample_ledger(), &model()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.date.to_string(), "2024-05-01");
        assert_eq!(first.new_blocks_leased, 3);
        assert_eq!(first.workloads_executed, 10);
        assert_eq!(first.blocks_by_category.get("standard"), Some(&3));
        assert_eq!(first.costs.lease_cost, 144.0);
        assert_eq!(first.costs.exec_cost, 5.0);
        assert_eq!(first.costs.trigger_cost, 2.5);
        assert_eq!(first.costs.acquisition_cost, 30.0);
        assert_eq!(first.costs.total_cost, 181.5);

        let second = &rows[1];
        assert_eq!(second.workloads_executed, 4);
        assert_eq!(second.blocks_by_category.get("premium"), Some(&1));
        assert_eq!(second.costs.total_cost, 9.0);
    }

    #[test]
    fn test_aggregate_stops_on_unknown_category() {
        let mut ledger = sample_ledger();
        ledger.push(entry("2024-05-03", None, BillingEvent::Lease {
            category: "economy".to_string(),
            hours: 1,
            blocks: 1,
        }));

        let err = aggregate_daily(&ledger, &model()).unwrap_err();
        assert!(matches!(err, CostError::UnknownCategory { .. }));
    }

    #[test]
    fn test_aggregate_by_workload() {
        let totals = aggregate_by_workload(&sample_ledger(), &model()).unwrap();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals["vqe"].total_cost, 151.5);
        assert_eq!(totals["qaoa"].total_cost, 9.0);
        assert_eq!(totals[UNASSIGNED_WORKLOAD].acquisition_cost, 30.0);
    }

    #[test]
    fn test_total_cost() {
        let ledger = sample_ledger();
        let total = total_cost(ledger.iter().map(|e| &e.event), &model()).unwrap();
        assert_eq!(total.total_cost, 190.5);
    }

    #[test]
    fn test_block_count_overflow_is_an_error() {
        let ledger = vec![
            entry("2024-05-01", None, BillingEvent::Acquisition { blocks: i64::MAX }),
            entry("2024-05-01", None, BillingEvent::Acquisition { blocks: 1 }),
        ];
        let cheap = CostModel::new(PriceSheet {
            acq_cost: 0.0,
            ..model().sheet().clone()
        });

        let err = aggregate_daily(&ledger, &cheap).unwrap_err();
        assert_eq!(err, CostError::OutOfRange { field: "new_blocks_leased" });

        let ledger = vec![
            entry("2024-05-01", None, BillingEvent::Transfer {
                category: "premium".to_string(),
                blocks: i64::MAX,
            }),
            entry("2024-05-01", None, BillingEvent::Lease {
                category: "premium".to_string(),
                hours: 0,
                blocks: 1,
            }),
        ];
        let err = aggregate_daily(&ledger, &model()).unwrap_err();
        assert_eq!(err, CostError::OutOfRange { field: "blocks_by_category" });

        // separate days do not share counters
        let ledger = vec![
            entry("2024-05-01", None, BillingEvent::Exec {
                category: "standard".to_string(),
                jobs: i64::MAX,
            }),
            entry("2024-05-02", None, BillingEvent::Exec {
                category: "standard".to_string(),
                jobs: 1,
            }),
        ];
        let rows = aggregate_daily(&ledger, &model()).unwrap();
        assert_eq!(rows[0].workloads_executed, i64::MAX);
        assert_eq!(rows[1].workloads_executed, 1);
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let pricey = CostModel::new(PriceSheet {
            acq_cost: f64::MAX,
            ..model().sheet().clone()
        });
        let ledger = vec![
            entry("2024-05-01", Some("vqe"), BillingEvent::Acquisition { blocks: 1 }),
            entry("2024-05-01", Some("vqe"), BillingEvent::Acquisition { blocks: 1 }),
        ];

        let err = aggregate_daily(&ledger, &pricey).unwrap_err();
        assert_eq!(err, CostError::OutOfRange { field: "total_cost" });
        assert!(aggregate_by_workload(&ledger, &pricey).is_err());
        assert!(total_cost(ledger.iter().map(|e| &e.event), &pricey).is_err());
    }

    #[test]
    fn test_empty_ledger() {
        assert!(aggregate_daily(&[], &model()).unwrap().is_empty());
        assert_eq!(total_cost(Vec::<&BillingEvent>::new(), &model()).unwrap(), CostBreakdown::zero());
    }
}
