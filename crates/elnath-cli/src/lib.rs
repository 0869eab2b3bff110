//! Command-line operator console for the elnath server supervisor.
//!
//! The binary is the composition root: it loads settings, applies command
//! line overrides, builds a [`elnath_runtime::Supervisor`] and renders its
//! event stream.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs
use anyhow as _;
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod parser;
pub mod presentation;
pub mod session;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use config_commands::ConfigCommand;
pub use error::CliError;
pub use parser::Cli;
