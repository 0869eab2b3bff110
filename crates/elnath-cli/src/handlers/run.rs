//! Run command handler: the interactive operator session.
//!
//! Starts the servers (unless `--no-start`), prints every supervisor event,
//! and reads session commands from stdin. Lifecycle commands run as
//! background tasks so the prompt stays responsive while a stubborn server
//! is being killed. Ctrl+C, `quit` or end of input stops every server
//! before returning.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use elnath_core::{Role, SupervisorEvent};
use elnath_runtime::{ProcessError, Supervisor, launch_client, launch_client_setup};
use futures_util::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::history::OutputHistory;
use crate::presentation::{format_event, format_event_json, format_output, format_status_table};
use crate::session::{HELP, SessionCommand, Target};

/// Time given to the renderer to print the final events after shutdown.
const RENDER_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Options for the run command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunArgs {
    pub no_start: bool,
    pub json: bool,
}

type SharedHistory = Arc<Mutex<OutputHistory>>;

/// Execute the run command.
pub async fn execute(ctx: &CliContext, args: RunArgs) -> Result<(), CliError> {
    let config = ctx.supervisor_config()?;
    info!(root = %config.root_dir().display(), "Starting operator session");

    let supervisor = Arc::new(Supervisor::new(config));
    let history: SharedHistory = Arc::new(Mutex::new(OutputHistory::default()));
    let renderer = tokio::spawn(render_events(
        supervisor.subscribe(),
        Arc::clone(&history),
        args.json,
    ));

    if !args.json {
        println!("Type 'help' for commands, 'quit' or Ctrl+C to stop every server and exit.");
    }
    if !args.no_start {
        spawn_lifecycle(&supervisor, SessionCommand::Start(Target::All));
    }

    let mut input = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else {
                    debug!("Input closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => dispatch(ctx, &supervisor, &history, command),
                    Err(e) => eprintln!("{e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    println!("Stopping all servers...");
    supervisor.shutdown().await;
    drop(supervisor);

    // In-flight commands may still hold the supervisor; don't wait for them.
    let abort = renderer.abort_handle();
    if timeout(RENDER_FLUSH_TIMEOUT, renderer).await.is_err() {
        abort.abort();
    }
    Ok(())
}

fn dispatch(
    ctx: &CliContext,
    supervisor: &Arc<Supervisor>,
    history: &SharedHistory,
    command: SessionCommand,
) {
    match command {
        SessionCommand::Start(_) | SessionCommand::Stop(_) | SessionCommand::Restart(_) => {
            spawn_lifecycle(supervisor, command);
        }
        SessionCommand::Status => print!("{}", format_status_table(&supervisor.snapshot())),
        SessionCommand::Log { role, lines } => print_history(history, role, lines),
        SessionCommand::Client | SessionCommand::Setup => {
            launch(ctx, matches!(command, SessionCommand::Setup));
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}

/// Run a lifecycle command in the background.
///
/// Failures already appear on the event stream and are only logged here.
/// Operations that were already satisfied print nothing.
fn spawn_lifecycle(supervisor: &Arc<Supervisor>, command: SessionCommand) {
    let supervisor = Arc::clone(supervisor);
    tokio::spawn(async move {
        let results: Vec<(Role, Result<bool, ProcessError>)> = match command {
            SessionCommand::Start(Target::All) => supervisor.start_all().await,
            SessionCommand::Stop(Target::All) => supervisor.stop_all().await,
            SessionCommand::Start(Target::One(role)) => vec![(role, supervisor.start(role).await)],
            SessionCommand::Stop(Target::One(role)) => vec![(role, supervisor.stop(role).await)],
            SessionCommand::Restart(target) => {
                let supervisor = &supervisor;
                join_all(
                    target
                        .roles()
                        .into_iter()
                        .map(|role| async move { (role, supervisor.restart(role).await) }),
                )
                .await
            }
            _ => Vec::new(),
        };

        for (role, result) in results {
            match result {
                Ok(true) => {}
                Ok(false) => debug!(%role, ?command, "Already satisfied"),
                Err(e) => debug!(%role, error = %e, "Lifecycle command failed"),
            }
        }
    });
}

fn print_history(history: &SharedHistory, role: Role, lines: usize) {
    let history = history.lock().unwrap_or_else(PoisonError::into_inner);
    match history.role(role) {
        Some(buffer) if !buffer.is_empty() => {
            for event in buffer.tail(lines) {
                println!("{}", format_output(event));
            }
        }
        _ => println!("No output from {} yet", role.label()),
    }
}

fn launch(ctx: &CliContext, setup: bool) {
    let result = ctx.client_path().and_then(|client| {
        if setup {
            launch_client_setup(&client).map_err(CliError::from)
        } else {
            launch_client(&client).map_err(CliError::from)
        }
    });
    match result {
        Ok(_) => println!("✓ {} launched", if setup { "Setup tool" } else { "Client" }),
        Err(e) => eprintln!("✗ {e}"),
    }
}

/// Print events and record output until the supervisor goes away.
async fn render_events(
    mut events: broadcast::Receiver<SupervisorEvent>,
    history: SharedHistory,
    json: bool,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(output) = event.as_output() {
                    history
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .record(output);
                    if output.is_error && output.is_synthetic() {
                        warn!(role = %output.role, "{}", output.text);
                    }
                }
                let line = if json {
                    format_event_json(&event)
                } else {
                    format_event(&event)
                };
                if let Some(line) = line {
                    println!("{line}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "Output renderer fell behind, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Read stdin lines on a dedicated thread.
///
/// A blocking read cannot be cancelled; keeping it off the runtime lets the
/// process exit while a read is pending.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
