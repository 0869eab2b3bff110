//! Config command handler.

use elnath_core::{Settings, SettingsUpdate};

use crate::bootstrap::{CliContext, display_optional, save_client_path, save_root_dir};
use crate::config_commands::ConfigCommand;
use crate::error::CliError;

/// Execute the config command.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Show => {
            let stored = ctx.store().load()?;
            show(&stored);
            println!("settings_file = {}", ctx.store().path().display());
        }
        ConfigCommand::SetRoot { path } => {
            let root = save_root_dir(ctx.store(), &path)?;
            println!("✓ Root directory set to {}", root.display());
        }
        ConfigCommand::SetClient { path } => {
            let client = save_client_path(ctx.store(), &path)?;
            println!("✓ Client set to {}", client.display());
        }
        ConfigCommand::Clear => {
            let mut stored = ctx.store().load_or_default();
            stored.merge(&SettingsUpdate {
                root_dir: Some(None),
                client_path: Some(None),
            });
            ctx.store().save(&stored)?;
            println!("✓ Settings cleared.");
        }
    }
    Ok(())
}

fn show(settings: &Settings) {
    println!("root_dir      = {}", display_optional(settings.root_dir.as_deref()));
    println!("client_path   = {}", display_optional(settings.client_path.as_deref()));
}
