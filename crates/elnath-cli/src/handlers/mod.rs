//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//!   (async where they drive the supervisor)
//! - Thin wrappers that validate CLI input, call into the core or runtime
//!   crates, and format output for the terminal

pub mod check;
pub mod client;
pub mod config;
pub mod paths;
pub mod run;
