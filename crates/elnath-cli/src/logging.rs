//! Tracing setup for the binary.
//!
//! Logs go to stderr so they never interleave with the server output the
//! session prints on stdout. With `--log-file` a plain-text copy is written
//! to `<data root>/logs/elnath.YYYY-MM-DD`, rotated daily.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log file prefix inside the logs directory.
pub const LOG_FILE_PREFIX: &str = "elnath";

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("elnath=debug,elnath_core=debug,elnath_runtime=debug,elnath_cli=debug")
    } else {
        EnvFilter::new("elnath=info,elnath_core=info,elnath_runtime=info,elnath_cli=info")
    }
}

/// Install the global subscriber.
///
/// Returns the file writer's guard; keep it alive until exit so buffered
/// lines are flushed.
pub fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false) // No ANSI colors in files
                .compact();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    guard
}
