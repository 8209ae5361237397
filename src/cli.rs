use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qpu-billing", version, about = "QPU block billing service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Price sheet path (overrides `pricing.sheet_path`)
    #[arg(long, env = "QPU_BILLING_PRICE_SHEET", global = true)]
    pub price_sheet: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the billing API server (default)
    Start,

    /// Reload the price sheet of a running server (sends SIGHUP)
    Reload {
        /// PID of the running server
        #[arg(short, long)]
        pid: u32,
    },

    /// Test configuration and price sheet validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Price a single billing event
    Quote {
        #[command(subcommand)]
        event: QuoteCommand,
    },

    /// Aggregate a ledger into daily cost rows
    Report {
        /// Ledger file (JSON array of entries)
        #[arg(short, long)]
        ledger: PathBuf,

        /// Write daily rows as CSV instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print totals per workload
        #[arg(long)]
        by_workload: bool,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Validate configuration file
    Validate,
}

#[derive(Subcommand, Debug, Clone)]
pub enum QuoteCommand {
    /// Lease blocks of a category
    Lease {
        category: String,
        #[arg(long, default_value_t = qpu_billing::pricing::DEFAULT_LEASE_HOURS, allow_negative_numbers = true)]
        hours: i64,
        #[arg(long, default_value_t = qpu_billing::pricing::DEFAULT_LEASE_BLOCKS, allow_negative_numbers = true)]
        blocks: i64,
    },

    /// Execute jobs on a category
    Exec {
        category: String,
        #[arg(allow_negative_numbers = true)]
        jobs: i64,
    },

    /// Trigger jobs
    Trigger {
        #[arg(allow_negative_numbers = true)]
        jobs: i64,
    },

    /// Acquire new blocks
    Acquisition {
        #[arg(allow_negative_numbers = true)]
        blocks: i64,
    },

    /// Transfer blocks into a category
    Transfer {
        category: String,
        #[arg(allow_negative_numbers = true)]
        blocks: i64,
    },
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
