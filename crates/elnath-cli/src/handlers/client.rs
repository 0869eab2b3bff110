//! Client command handler.

use elnath_runtime::{launch_client, launch_client_setup};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Launch the client, or its setup tool with `setup`.
pub fn execute(ctx: &CliContext, setup: bool) -> Result<(), CliError> {
    let client = ctx.client_path()?;
    let pid = if setup {
        launch_client_setup(&client)?
    } else {
        launch_client(&client)?
    };

    let what = if setup { "Setup tool" } else { "Client" };
    match pid {
        Some(pid) => println!("✓ {what} launched (pid {pid})"),
        None => println!("✓ {what} launched"),
    }
    Ok(())
}
