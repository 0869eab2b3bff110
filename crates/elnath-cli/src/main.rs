//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers; every handler receives the
//! bootstrapped `CliContext`.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use elnath_cli::handlers::{self, run::RunArgs};
use elnath_cli::logging::init_tracing;
use elnath_cli::{Cli, CliConfig, CliError, Commands, bootstrap};
use elnath_core::logs_dir;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_dir = if cli.log_file {
        match logs_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                eprintln!("File logging disabled: {e}");
                None
            }
        }
    } else {
        None
    };
    let _log_guard = init_tracing(cli.verbose, log_dir.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig {
        settings_path: cli.settings,
        root_dir: cli.root_dir,
        client_path: cli.client_path,
    })?;

    match command {
        Commands::Run { no_start, json } => {
            handlers::run::execute(&ctx, RunArgs { no_start, json }).await?;
        }
        Commands::Check => handlers::check::execute(&ctx)?,
        Commands::Config { command } => handlers::config::execute(&ctx, command)?,
        Commands::Client { setup } => handlers::client::execute(&ctx, setup)?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    }

    Ok(())
}
