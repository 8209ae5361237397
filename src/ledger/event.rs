use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pricing::{DEFAULT_LEASE_BLOCKS, DEFAULT_LEASE_HOURS};

/// A single billable event
///
/// Serialized with an `"event"` tag, e.g.
/// `{"event": "lease", "category": "standard", "hours": 24, "blocks": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BillingEvent {
    Lease {
        category: String,
        #[serde(default = "default_lease_hours")]
        hours: i64,
        #[serde(default = "default_lease_blocks")]
        blocks: i64,
    },
    Exec {
        category: String,
        jobs: i64,
    },
    Trigger {
        jobs: i64,
    },
    Acquisition {
        blocks: i64,
    },
    Transfer {
        category: String,
        blocks: i64,
    },
}

fn default_lease_hours() -> i64 {
    DEFAULT_LEASE_HOURS
}

fn default_lease_blocks() -> i64 {
    DEFAULT_LEASE_BLOCKS
}

impl BillingEvent {
    /// Event kind name, matching the serde tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lease { .. } => "lease",
            Self::Exec { .. } => "exec",
            Self::Trigger { .. } => "trigger",
            Self::Acquisition { .. } => "acquisition",
            Self::Transfer { .. } => "transfer",
        }
    }
}

/// A dated ledger line, optionally attributed to a workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(flatten)]
    pub event: BillingEvent,
}

/// Read a ledger file (JSON array of entries)
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file: {:?}", path))?;
    let entries: Vec<LedgerEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse ledger file: {:?}", path))?;
    Ok(entries)
}
