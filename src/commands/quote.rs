use anyhow::Result;
use colored::Colorize;
use qpu_billing::ledger::BillingEvent;
use qpu_billing::pricing::{CostBreakdown, CostModel};
use std::path::Path;

use crate::cli::QuoteCommand;

impl QuoteCommand {
    pub fn into_event(self) -> BillingEvent {
        match self {
            Self::Lease {
                category,
                hours,
                blocks,
            } => BillingEvent::Lease {
                category,
                hours,
                blocks,
            },
            Self::Exec { category, jobs } => BillingEvent::Exec { category, jobs },
            Self::Trigger { jobs } => BillingEvent::Trigger { jobs },
            Self::Acquisition { blocks } => BillingEvent::Acquisition { blocks },
            Self::Transfer { category, blocks } => BillingEvent::Transfer { category, blocks },
        }
    }
}

/// Execute the quote command
pub fn execute(sheet_path: &Path, command: QuoteCommand) -> Result<()> {
    let model = CostModel::from_path(sheet_path)?;
    let event = command.into_event();
    let breakdown = model.breakdown(&event)?;

    println!("{} {}", "Event:".bold(), serde_json::to_string(&event)?);
    print_breakdown(&breakdown);

    Ok(())
}

fn print_breakdown(breakdown: &CostBreakdown) {
    let parts = [
        ("Lease", breakdown.lease_cost),
        ("Exec", breakdown.exec_cost),
        ("Trigger", breakdown.trigger_cost),
        ("Acquisition", breakdown.acquisition_cost),
        ("Transfer", breakdown.transfer_cost),
    ];
    for (label, amount) in parts.iter().filter(|(_, amount)| *amount != 0.0) {
        println!("  {}: {}", label.cyan(), amount);
    }
    println!("  {}: {}", "Total".green().bold(), breakdown.total_cost);
}
