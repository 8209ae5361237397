use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use qpu_billing::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server configures tracing from its config file once loaded
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn", false);
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config, args.price_sheet.clone()).await?;
        }
        cli::Commands::Reload { pid } => {
            commands::reload::execute(pid)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config, args.price_sheet.clone())?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Quote { event } => {
            let sheet = commands::resolve_sheet_path(args.price_sheet.clone(), &args.config)?;
            commands::quote::execute(&sheet, event)?;
        }
        cli::Commands::Report {
            ledger,
            output,
            by_workload,
        } => {
            let sheet = commands::resolve_sheet_path(args.price_sheet.clone(), &args.config)?;
            commands::report::execute(&sheet, &ledger, output, by_workload)?;
        }
        cli::Commands::Version => {
            println!("QPU Billing v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
