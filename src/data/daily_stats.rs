use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use crate::ledger::DailyStats;
use crate::pricing::CostBreakdown;

/// Column order of the `daily_stats.csv` artifact
pub const DAILY_STATS_COLUMNS: [&str; 10] = [
    "date",
    "new_blocks_leased",
    "workloads_executed",
    "blocks_by_category",
    "lease_cost",
    "exec_cost",
    "trigger_cost",
    "acquisition_cost",
    "transfer_cost",
    "total_cost",
];

/// Write daily stats rows as CSV
pub fn write_daily_stats<W: Write>(rows: &[DailyStats], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(DAILY_STATS_COLUMNS)?;

    for row in rows {
        let categories = serde_json::to_string(&row.blocks_by_category)?;
        csv_writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.new_blocks_leased.to_string(),
            row.workloads_executed.to_string(),
            categories,
            row.costs.lease_cost.to_string(),
            row.costs.exec_cost.to_string(),
            row.costs.trigger_cost.to_string(),
            row.costs.acquisition_cost.to_string(),
            row.costs.transfer_cost.to_string(),
            row.costs.total_cost.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the `daily_stats.csv` artifact to disk
pub fn write_daily_stats_csv(rows: &[DailyStats], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create daily stats file: {:?}", path))?;
    write_daily_stats(rows, file)
}

/// Read daily stats rows from CSV
///
/// Only `date` is required; missing numeric columns read as zero and a missing
/// `total_cost` is recomputed from the breakdown columns.
pub fn read_daily_stats<R: Read>(reader: R) -> Result<Vec<DailyStats>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let date_idx = column("date").ok_or_else(|| anyhow!("daily stats missing 'date' column"))?;
    let blocks_idx = column("new_blocks_leased");
    let workloads_idx = column("workloads_executed");
    let categories_idx = column("blocks_by_category");
    let lease_idx = column("lease_cost");
    let exec_idx = column("exec_cost");
    let trigger_idx = column("trigger_cost");
    let acquisition_idx = column("acquisition_cost");
    let transfer_idx = column("transfer_cost");
    let total_idx = column("total_cost");

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let date = parse_date(cell(Some(date_idx)))
            .with_context(|| format!("daily stats row {}", line + 1))?;

        let mut costs = CostBreakdown {
            lease_cost: parse_number(cell(lease_idx))?,
            exec_cost: parse_number(cell(exec_idx))?,
            trigger_cost: parse_number(cell(trigger_idx))?,
            acquisition_cost: parse_number(cell(acquisition_idx))?,
            transfer_cost: parse_number(cell(transfer_idx))?,
            total_cost: 0.0,
        };
        match total_idx {
            Some(_) => costs.total_cost = parse_number(cell(total_idx))?,
            None => costs.calculate_total(),
        }

        rows.push(DailyStats {
            date,
            new_blocks_leased: parse_count(cell(blocks_idx))?,
            workloads_executed: parse_count(cell(workloads_idx))?,
            blocks_by_category: parse_category_counts(cell(categories_idx))?,
            costs,
        });
    }

    Ok(rows)
}

/// Read the `daily_stats.csv` artifact from disk
pub fn read_daily_stats_csv(path: &Path) -> Result<Vec<DailyStats>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open daily stats file: {:?}", path))?;
    read_daily_stats(file)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    // upstream dates may carry a time component
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").with_context(|| format!("invalid date '{}'", value))
}

fn parse_number(value: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .with_context(|| format!("invalid number '{}'", value))
}

fn parse_count(value: &str) -> Result<i64> {
    if let Ok(count) = value.parse::<i64>() {
        return Ok(count);
    }
    // pandas writes integer columns with NaN holes as floats
    Ok(parse_number(value)? as i64)
}

/// Parse a category→count object, accepting JSON or single-quoted dict notation
pub fn parse_category_counts(value: &str) -> Result<BTreeMap<String, i64>> {
    if value.is_empty() {
        return Ok(BTreeMap::new());
    }

    let normalized = value.replace('\'', "\"");
    let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(&normalized)
        .with_context(|| format!("invalid blocks_by_category '{}'", value))?;

    let mut counts = BTreeMap::new();
    for (category, count) in parsed {
        let count = match count.as_i64() {
            Some(n) => n,
            None => match count.as_f64() {
                Some(n) => n as i64,
                None => bail!("non-numeric block count for '{}'", category),
            },
        };
        counts.insert(category, count);
    }
    Ok(counts)
}
