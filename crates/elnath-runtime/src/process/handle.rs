//! Lifecycle of one server process.
//!
//! A [`ProcessHandle`] launches its executable, captures both output streams
//! and watches for exit. The `Child` itself lives in a monitor task; the
//! handle talks to it through a oneshot stop channel and learns the outcome
//! from the task's return value. Dropping a running handle drops the stop
//! sender, which the monitor treats as a stop request.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use elnath_core::{ProcessState, ProcessStatus, Role};
use futures_util::future::join_all;
use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::command::server_command;
use super::publisher::RolePublisher;
use super::shutdown::{ShutdownOutcome, shutdown_child, sweep_group};
use super::stream::spawn_stream_reader;
use crate::config::{DEFAULT_RESTART_SETTLE, ShutdownPolicy};
use crate::error::ProcessError;

/// How long to wait for the readers to hit EOF once the child is gone.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Why the monitor task returned.
#[derive(Debug)]
enum MonitorExit {
    /// Exited without being asked.
    Exited,
    /// Stopped on request.
    Stopped(ShutdownOutcome),
    /// Termination could not be requested or confirmed.
    Failed(io::Error),
}

#[derive(Debug)]
struct Attached {
    pid: u32,
    stop_tx: oneshot::Sender<()>,
    monitor: JoinHandle<MonitorExit>,
}

/// One supervised server process.
#[derive(Debug)]
pub struct ProcessHandle {
    role: Role,
    executable: PathBuf,
    working_dir: PathBuf,
    policy: ShutdownPolicy,
    restart_settle: Duration,
    publisher: RolePublisher,
    attached: Option<Attached>,
}

impl ProcessHandle {
    pub fn new(
        executable: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        policy: ShutdownPolicy,
        publisher: RolePublisher,
    ) -> Self {
        Self {
            role: publisher.role(),
            executable: executable.into(),
            working_dir: working_dir.into(),
            policy,
            restart_settle: DEFAULT_RESTART_SETTLE,
            publisher,
            attached: None,
        }
    }

    #[must_use]
    pub const fn with_restart_settle(mut self, settle: Duration) -> Self {
        self.restart_settle = settle;
        self
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn status(&self) -> ProcessStatus {
        self.publisher.status()
    }

    pub fn state(&self) -> ProcessState {
        self.status().state()
    }

    pub fn pid(&self) -> Option<u32> {
        self.status().pid()
    }

    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }

    /// Starting, running or stopping.
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Launch the executable.
    ///
    /// Returns `Ok(false)` without side effects when the process is already
    /// active. Failures are reported on the role's stream, leave the state
    /// `Errored`, and are returned.
    pub async fn start(&mut self) -> Result<bool, ProcessError> {
        if self.is_active() {
            debug!(role = %self.role, "Start ignored, already active");
            return Ok(false);
        }

        // Monitor of an instance that exited on its own.
        if let Some(previous) = self.attached.take() {
            let _ = previous.monitor.await;
        }

        self.publisher.set(ProcessStatus::starting());

        if !self.executable.is_file() {
            return Err(self.fail_start(ProcessError::ExecutableMissing {
                role: self.role,
                path: self.executable.clone(),
            }));
        }

        let mut child = match server_command(&self.executable, &self.working_dir).spawn() {
            Ok(child) => child,
            Err(source) => {
                return Err(self.fail_start(ProcessError::Launch {
                    role: self.role,
                    path: self.executable.clone(),
                    source,
                }));
            }
        };

        let Some(pid) = child.id() else {
            return Err(self.fail_start(ProcessError::Launch {
                role: self.role,
                path: self.executable.clone(),
                source: io::Error::other("process exited before its pid was read"),
            }));
        };

        // Announce before the readers run so "started" precedes any output.
        self.publisher.set(ProcessStatus::running(pid));
        self.publisher
            .notice(format!("{} started (pid {pid})", self.role.label()), false);
        info!(role = %self.role, pid, executable = %self.executable.display(), "Process started");

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_stream_reader(stdout, self.publisher.clone(), false));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_stream_reader(stderr, self.publisher.clone(), true));
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let monitor = tokio::spawn(monitor(
            child,
            pid,
            readers,
            stop_rx,
            self.publisher.clone(),
            self.policy,
        ));

        self.attached = Some(Attached {
            pid,
            stop_tx,
            monitor,
        });
        Ok(true)
    }

    /// Terminate the process, politely first.
    ///
    /// Returns `Ok(false)` when nothing was running. Blocks for at most the
    /// policy's grace plus kill windows. On error the handle is released
    /// anyway and the state is `Errored`.
    pub async fn stop(&mut self) -> Result<bool, ProcessError> {
        let Some(attached) = self.attached.take() else {
            return Ok(false);
        };
        let pid = attached.pid;

        if attached.monitor.is_finished() {
            let _ = attached.monitor.await;
            return Ok(false);
        }

        info!(role = %self.role, pid, "Stopping process");
        // A closed channel means the monitor is already on its way out.
        let _ = attached.stop_tx.send(());

        match attached.monitor.await {
            Ok(MonitorExit::Stopped(ShutdownOutcome::Unconfirmed)) => {
                Err(ProcessError::StopUnconfirmed {
                    role: self.role,
                    pid,
                    waited: self.policy.kill_timeout,
                })
            }
            Ok(MonitorExit::Stopped(_)) => Ok(true),
            Ok(MonitorExit::Exited) => Ok(false),
            Ok(MonitorExit::Failed(source)) => Err(ProcessError::Stop {
                role: self.role,
                pid,
                source,
            }),
            Err(join_err) => {
                let message = format!(
                    "{} (pid {pid}) monitor failed: {join_err}",
                    self.role.label()
                );
                warn!(role = %self.role, pid, error = %join_err, "Process monitor failed");
                self.publisher.notice(message, true);
                self.publisher.set(ProcessStatus::errored());
                Err(ProcessError::Stop {
                    role: self.role,
                    pid,
                    source: io::Error::other(join_err.to_string()),
                })
            }
        }
    }

    /// Stop, wait the settle delay, start.
    ///
    /// The settle delay only applies when something was actually stopped.
    /// A failed stop aborts the restart.
    pub async fn restart(&mut self) -> Result<bool, ProcessError> {
        if self.stop().await? {
            sleep(self.restart_settle).await;
        }
        self.start().await
    }

    fn fail_start(&self, err: ProcessError) -> ProcessError {
        warn!(role = %self.role, error = %err, "Process failed to start");
        self.publisher.notice(err.to_string(), true);
        self.publisher.set(ProcessStatus::errored());
        err
    }
}

/// Own the child until it exits or a stop is requested.
async fn monitor(
    mut child: Child,
    pid: u32,
    readers: Vec<JoinHandle<()>>,
    stop_rx: oneshot::Receiver<()>,
    publisher: RolePublisher,
    policy: ShutdownPolicy,
) -> MonitorExit {
    let role = publisher.role();

    tokio::select! {
        result = child.wait() => {
            sweep_group(pid);
            drain_readers(readers).await;
            match result {
                Ok(status) => {
                    let text = describe_exit(role, status);
                    if status.success() {
                        info!(%role, pid, "{text}");
                    } else {
                        warn!(%role, pid, "{text}");
                    }
                    publisher.notice(text, !status.success());
                }
                Err(e) => {
                    warn!(%role, pid, error = %e, "Failed to collect exit status");
                    publisher.notice(
                        format!("{} (pid {pid}) exit status unavailable: {e}", role.label()),
                        true,
                    );
                }
            }
            publisher.set(ProcessStatus::stopped());
            MonitorExit::Exited
        }
        // Err means the handle was dropped; treat it as a stop request.
        _ = stop_rx => {
            publisher.set(ProcessStatus::stopping(pid));

            let result = shutdown_child(&mut child, policy, || {
                warn!(%role, pid, grace_ms = policy.grace.as_millis(), "Termination request ignored, killing");
                publisher.notice(
                    format!(
                        "{} (pid {pid}) did not exit within {} ms, forcing termination",
                        role.label(),
                        policy.grace.as_millis()
                    ),
                    true,
                );
            })
            .await;
            drain_readers(readers).await;

            match result {
                Ok(outcome @ ShutdownOutcome::Graceful(_)) => {
                    info!(%role, pid, "Process stopped");
                    publisher.notice(format!("{} stopped", role.label()), false);
                    publisher.set(ProcessStatus::stopped());
                    MonitorExit::Stopped(outcome)
                }
                Ok(outcome @ ShutdownOutcome::Killed(_)) => {
                    warn!(%role, pid, "Process killed");
                    publisher.notice(format!("{} killed", role.label()), true);
                    publisher.set(ProcessStatus::stopped());
                    MonitorExit::Stopped(outcome)
                }
                Ok(ShutdownOutcome::Unconfirmed) => {
                    warn!(%role, pid, "Forced kill not confirmed, releasing handle");
                    publisher.notice(
                        format!(
                            "{} (pid {pid}) did not confirm exit {} ms after forced kill, releasing it",
                            role.label(),
                            policy.kill_timeout.as_millis()
                        ),
                        true,
                    );
                    publisher.set(ProcessStatus::errored());
                    MonitorExit::Stopped(ShutdownOutcome::Unconfirmed)
                }
                Err(e) => {
                    warn!(%role, pid, error = %e, "Failed to stop process");
                    publisher.notice(format!("Failed to stop {} (pid {pid}): {e}", role.label()), true);
                    publisher.set(ProcessStatus::errored());
                    MonitorExit::Failed(e)
                }
            }
        }
    }
}

/// Wait for the readers to flush the pipes, aborting stragglers.
///
/// A grandchild that inherited the pipes can keep them open forever.
async fn drain_readers(readers: Vec<JoinHandle<()>>) {
    let aborts: Vec<_> = readers.iter().map(JoinHandle::abort_handle).collect();
    if timeout(READER_DRAIN_TIMEOUT, join_all(readers)).await.is_err() {
        debug!("Output readers still open after exit, aborting");
        for abort in aborts {
            abort.abort();
        }
    }
}

fn describe_exit(role: Role, status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("{} exited with code {code}", role.label());
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("{} terminated by signal {signal}", role.label());
        }
    }

    format!("{} exited", role.label())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::SupervisorEventBroadcaster;
    use elnath_core::SupervisorEvent;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};
    use tokio::sync::broadcast;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn handle_for(
        executable: PathBuf,
        dir: &TempDir,
    ) -> (ProcessHandle, broadcast::Receiver<SupervisorEvent>) {
        let events = Arc::new(SupervisorEventBroadcaster::default());
        let rx = events.subscribe();
        let policy = ShutdownPolicy::new(Duration::from_millis(300), Duration::from_millis(2000));
        let handle = ProcessHandle::new(
            executable,
            dir.path(),
            policy,
            RolePublisher::new(Role::Login, events),
        )
        .with_restart_settle(Duration::from_millis(50));
        (handle, rx)
    }

    fn notices(rx: &mut broadcast::Receiver<SupervisorEvent>) -> Vec<(String, bool)> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Some(output) = event.as_output()
                && output.is_synthetic()
            {
                out.push((output.text.clone(), output.is_error));
            }
        }
        out
    }

    #[tokio::test]
    async fn start_twice_is_a_noop() {
        let dir = tempdir().unwrap();
        let exe = script(&dir, "login-server", "exec sleep 30");
        let (mut handle, _rx) = handle_for(exe, &dir);

        assert!(handle.start().await.unwrap());
        let pid = handle.pid();
        assert!(!handle.start().await.unwrap());
        assert_eq!(handle.pid(), pid);

        assert!(handle.stop().await.unwrap());
        assert_eq!(handle.state(), ProcessState::Stopped);
        assert!(!handle.stop().await.unwrap());
    }

    #[tokio::test]
    async fn missing_executable_is_errored() {
        let dir = tempdir().unwrap();
        let (mut handle, mut rx) = handle_for(dir.path().join("login-server"), &dir);

        let err = handle.start().await.unwrap_err();
        assert!(matches!(err, ProcessError::ExecutableMissing { .. }));
        assert_eq!(handle.state(), ProcessState::Errored);
        assert!(!handle.is_running());

        let lines = notices(&mut rx);
        assert!(lines.iter().any(|(text, is_error)| *is_error && text.contains("not found")));
    }

    #[tokio::test]
    async fn unsolicited_exit_is_reported() {
        let dir = tempdir().unwrap();
        let exe = script(&dir, "login-server", "echo bye; exit 3");
        let (mut handle, mut rx) = handle_for(exe, &dir);

        handle.start().await.unwrap();
        let mut status = handle.publisher.watch();
        status
            .wait_for(|s| s.state() == ProcessState::Stopped)
            .await
            .unwrap();

        let lines = notices(&mut rx);
        assert!(lines.contains(&("Login server exited with code 3".to_string(), true)));
        assert!(!handle.stop().await.unwrap());

        // Startable again after exiting.
        assert!(handle.start().await.unwrap());
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn restart_replaces_pid() {
        let dir = tempdir().unwrap();
        let exe = script(&dir, "login-server", "exec sleep 30");
        let (mut handle, _rx) = handle_for(exe, &dir);

        handle.start().await.unwrap();
        let before = handle.pid();
        assert!(handle.restart().await.unwrap());
        assert!(handle.is_running());
        assert_ne!(handle.pid(), before);
        handle.stop().await.unwrap();
    }

    #[test]
    fn exit_description_uses_code() {
        use std::os::unix::process::ExitStatusExt;
        let status = ExitStatus::from_raw(3 << 8);
        assert_eq!(describe_exit(Role::Map, status), "Map server exited with code 3");
        let killed = ExitStatus::from_raw(9);
        assert_eq!(
            describe_exit(Role::Map, killed),
            "Map server terminated by signal 9"
        );
    }
}
