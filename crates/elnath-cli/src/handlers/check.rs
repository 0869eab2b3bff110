//! Check command handler.
//!
//! Validates the configured root directory and client path and lists what
//! is missing.

use console::style;
use elnath_core::{inspect_root_dir, setup_tool_path, validate_client_path};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the check command.
///
/// Fails with a configuration error when the root directory is unusable.
/// A missing client is reported but does not fail the check.
pub fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let settings = ctx.settings();

    let Some(root) = settings.root_dir.as_deref() else {
        println!("{} No server root directory configured", style("✗").red());
        return Err(CliError::Config(
            "Run `elnath config set-root <path>` first".to_string(),
        ));
    };

    let report = inspect_root_dir(root)?;
    println!("Root directory: {}", report.root.display());
    for (role, path) in &report.present {
        println!("  {} {:<6} {}", style("✓").green(), role.as_str(), path.display());
    }
    for (role, path) in &report.missing {
        println!(
            "  {} {:<6} {} (missing)",
            style("✗").red(),
            role.as_str(),
            path.display()
        );
    }

    match settings.client_path.as_deref() {
        Some(client) => match validate_client_path(client) {
            Ok(client) => {
                println!("Client: {} {}", style("✓").green(), client.display());
                match setup_tool_path(&client) {
                    Some(setup) => println!("Setup tool: {}", setup.display()),
                    None => println!("Setup tool: not found"),
                }
            }
            Err(e) => println!("Client: {} {e}", style("✗").red()),
        },
        None => println!("Client: not configured"),
    }

    if report.is_complete() {
        println!("{} Ready to run", style("✓").green());
        Ok(())
    } else {
        Err(CliError::Config(format!(
            "{} server executable(s) missing from {}",
            report.missing.len(),
            report.root.display()
        )))
    }
}
