//! Settings management subcommands.

use clap::Subcommand;

/// Settings commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the stored settings
    Show,
    /// Validate and store the server root directory
    SetRoot {
        /// Directory containing the login, char and map server executables
        path: String,
    },
    /// Validate and store the client executable
    SetClient {
        /// Path to the client executable
        path: String,
    },
    /// Forget the stored root directory and client path
    Clear,
}
