use anyhow::Result;
use colored::Colorize;
use qpu_billing::signals::send_reload_signal;
use tracing::info;

/// Execute the reload command
///
/// Sends SIGHUP to the running server, which reloads its price sheet. A sheet
/// that fails to load leaves the previous one in effect.
pub fn execute(pid: u32) -> Result<()> {
    println!(
        "{} {}",
        "Reloading price sheet".yellow(),
        format!("(PID: {})", pid).cyan()
    );

    send_reload_signal(pid)?;

    println!("{}", "  Reload signal sent successfully".green());
    println!(
        "  {}",
        "Note: Check server logs to verify reload succeeded".dimmed()
    );
    info!("SIGHUP sent to PID {}", pid);

    Ok(())
}
