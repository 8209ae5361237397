use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use qpu_billing::data::write_daily_stats_csv;
use qpu_billing::ledger::{aggregate_by_workload, aggregate_daily, load_ledger, DailyStats};
use qpu_billing::pricing::{CostBreakdown, CostModel};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the report command
///
/// Prices every ledger entry against the sheet and prints one row per day, or
/// writes the rows as a `daily_stats.csv` artifact when `output` is given.
pub fn execute(
    sheet_path: &Path,
    ledger_path: &Path,
    output: Option<PathBuf>,
    by_workload: bool,
) -> Result<()> {
    let model = CostModel::from_path(sheet_path)?;
    let entries = load_ledger(ledger_path)?;
    info!("Loaded {} ledger entries from {:?}", entries.len(), ledger_path);

    let days = aggregate_daily(&entries, &model)?;

    match output {
        Some(path) => {
            write_daily_stats_csv(&days, &path)?;
            println!(
                "{} {} ({} days)",
                "✓ Daily stats written to".green(),
                path.display(),
                days.len()
            );
        }
        None => println!("{}", daily_table(&days)),
    }

    if by_workload {
        let workloads = aggregate_by_workload(&entries, &model)?;
        println!();
        println!("{}", "Cost by Workload:".bold());
        println!("{}", workload_table(&workloads));
    }

    let total: f64 = days.iter().map(|d| d.costs.total_cost).sum();
    println!("{} {}", "Total cost:".green().bold(), total);

    Ok(())
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn daily_table(days: &[DailyStats]) -> Table {
    let mut table = new_table(&[
        "DATE",
        "NEW BLOCKS",
        "WORKLOADS",
        "LEASE",
        "EXEC",
        "TRIGGER",
        "ACQUISITION",
        "TRANSFER",
        "TOTAL",
    ]);

    for day in days {
        table.add_row(vec![
            Cell::new(day.date.format("%Y-%m-%d")),
            Cell::new(day.new_blocks_leased),
            Cell::new(day.workloads_executed),
            Cell::new(format!("{:.2}", day.costs.lease_cost)),
            Cell::new(format!("{:.2}", day.costs.exec_cost)),
            Cell::new(format!("{:.2}", day.costs.trigger_cost)),
            Cell::new(format!("{:.2}", day.costs.acquisition_cost)),
            Cell::new(format!("{:.2}", day.costs.transfer_cost)),
            Cell::new(format!("{:.2}", day.costs.total_cost)),
        ]);
    }

    table
}

fn workload_table(workloads: &BTreeMap<String, CostBreakdown>) -> Table {
    let mut table = new_table(&["WORKLOAD", "TOTAL", "SHARE"]);
    let grand_total: f64 = workloads.values().map(|c| c.total_cost).sum();

    for (workload, costs) in workloads {
        let share = if grand_total > 0.0 {
            costs.total_cost / grand_total * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(workload),
            Cell::new(format!("{:.2}", costs.total_cost)),
            Cell::new(format!("{:.1}%", share)),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "lease_fee: {standard: 2.0}\nexec_fee: {standard: 0.5}\ntrigger_fee: 0.1\nacq_cost: 10.0\ntransfer_fee: {premium: 5.0}\n";

    const LEDGER: &str = r#"[
        {"date": "2024-03-01", "workload": "vqe", "event": "lease", "category": "standard", "hours": 24, "blocks": 3},
        {"date": "2024-03-01", "event": "acquisition", "blocks": 1},
        {"date": "2024-03-02", "workload": "qaoa", "event": "exec", "category": "standard", "jobs": 4}
    ]"#;

    #[test]
    fn test_report_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("sheet.yaml");
        let ledger = dir.path().join("ledger.json");
        let output = dir.path().join("out").join("daily_stats.csv");
        std::fs::write(&sheet, SHEET).unwrap();
        std::fs::write(&ledger, LEDGER).unwrap();

        execute(&sheet, &ledger, Some(output.clone()), true).unwrap();

        let rows = qpu_billing::data::read_daily_stats_csv(&output).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].costs.total_cost, 154.0);
        assert_eq!(rows[1].costs.total_cost, 2.0);
    }

    #[test]
    fn test_workload_table_shares() {
        let mut a = CostBreakdown::zero();
        a.lease_cost = 3.0;
        a.calculate_total();
        let mut b = CostBreakdown::zero();
        b.exec_cost = 1.0;
        b.calculate_total();
        let workloads = BTreeMap::from([("a".to_string(), a), ("b".to_string(), b)]);

        let rendered = workload_table(&workloads).to_string();
        assert!(rendered.contains("75.0%"));
        assert!(rendered.contains("25.0%"));
    }
}
