//! Paths command handler.
//!
//! Displays every resolved path for diagnostics.

use elnath_core::{DATA_DIR_ENV, data_root, logs_dir};

use crate::bootstrap::{CliContext, display_optional};
use crate::error::CliError;

/// Print resolved paths in `key = value` format.
pub fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let settings = ctx.settings();
    println!("data_root      = {}", data_root()?.display());
    println!("settings_file  = {}", ctx.store().path().display());
    println!("logs_dir       = {}", logs_dir()?.display());
    println!("root_dir       = {}", display_optional(settings.root_dir.as_deref()));
    println!("client_path    = {}", display_optional(settings.client_path.as_deref()));
    println!();
    println!("Set {DATA_DIR_ENV} to move the data root.");
    Ok(())
}
