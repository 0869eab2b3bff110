//! Top-level subcommands.

use clap::Subcommand;

use crate::config_commands::ConfigCommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the servers and follow their output interactively
    Run {
        /// Do not start every server on launch
        #[arg(long)]
        no_start: bool,
        /// Print events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate the configured root directory and client path
    Check,
    /// View or change stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Launch the game client
    Client {
        /// Launch the client's setup tool instead
        #[arg(long)]
        setup: bool,
    },
    /// Show resolved paths for diagnostics
    Paths,
}
