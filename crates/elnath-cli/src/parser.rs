//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Supervise the login, char and map servers of a local game server.
#[derive(Parser)]
#[command(name = "elnath")]
#[command(about = "Run and watch the login, char and map servers")]
#[command(version)]
pub struct Cli {
    /// Server root directory for this run (saved when valid)
    #[arg(long = "root-dir", global = true, env = "ELNATH_ROOT_DIR")]
    pub root_dir: Option<String>,

    /// Client executable for this run (saved when valid)
    #[arg(long = "client-path", global = true, env = "ELNATH_CLIENT_PATH")]
    pub client_path: Option<String>,

    /// Also write logs to a daily file under the data directory
    #[arg(long = "log-file", global = true)]
    pub log_file: bool,

    /// Use an alternate settings file
    #[arg(long = "settings", global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
