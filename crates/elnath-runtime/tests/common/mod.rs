//! Shared fixtures for supervisor integration tests.
//!
//! Each test gets a scratch root directory holding small `/bin/sh` scripts
//! named like the real server executables.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use elnath_core::{ProcessState, ProcessStatus, Role, SupervisorEvent, role_executable_path};
use elnath_runtime::{ShutdownPolicy, Supervisor, SupervisorConfig};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tempfile::TempDir;
use tokio::sync::{broadcast, watch};
use tokio::time::{sleep, timeout};

/// Grace window used by tests.
pub const TEST_GRACE: Duration = Duration::from_millis(400);
/// Kill window used by tests.
pub const TEST_KILL_TIMEOUT: Duration = Duration::from_millis(2000);
/// Upper bound for any single wait in a test.
pub const WAIT: Duration = Duration::from_secs(10);

/// Runs until stopped.
pub const COOPERATIVE: &str = "echo ready\nexec sleep 30";
/// Ignores the polite termination request.
pub const STUBBORN: &str = "trap '' TERM\necho ready\nwhile true; do sleep 0.1; done";

pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("failed to create temp root"),
        }
    }

    /// Fixture with every role running `body`.
    pub fn with_all(body: &str) -> Self {
        let fixture = Self::new();
        for role in Role::ALL {
            fixture.server(role, body);
        }
        fixture
    }

    /// Write the executable for `role`.
    pub fn server(&self, role: Role, body: &str) -> PathBuf {
        let path = role_executable_path(self.root.path(), role);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod script");
        path
    }

    pub fn config(&self) -> SupervisorConfig {
        SupervisorConfig::new(self.root.path())
            .with_shutdown_policy(ShutdownPolicy::new(TEST_GRACE, TEST_KILL_TIMEOUT))
            .with_restart_settle(Duration::from_millis(100))
    }

    pub fn supervisor(&self) -> Supervisor {
        Supervisor::new(self.config())
    }
}

/// Wait until `role`'s status satisfies `pred`.
pub async fn wait_for_status(
    mut rx: watch::Receiver<ProcessStatus>,
    pred: impl FnMut(&ProcessStatus) -> bool,
) -> ProcessStatus {
    let status = timeout(WAIT, rx.wait_for(pred))
        .await
        .expect("timed out waiting for status")
        .expect("status channel closed");
    *status
}

/// Wait until `role` reaches `state`.
pub async fn wait_for_state(supervisor: &Supervisor, role: Role, state: ProcessState) {
    wait_for_status(supervisor.watch(role), |s| s.state() == state).await;
}

/// Receive events until one matches, returning everything seen for `role`.
pub async fn collect_until(
    rx: &mut broadcast::Receiver<SupervisorEvent>,
    role: Role,
    mut done: impl FnMut(&SupervisorEvent) -> bool,
) -> Vec<SupervisorEvent> {
    let mut seen = Vec::new();
    loop {
        let event = timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if event.role() != role {
            continue;
        }
        let finished = done(&event);
        seen.push(event);
        if finished {
            return seen;
        }
    }
}

/// Wait for an output line with exactly `text` from `role`.
pub async fn wait_for_line(rx: &mut broadcast::Receiver<SupervisorEvent>, role: Role, text: &str) {
    collect_until(rx, role, |event| {
        event.as_output().is_some_and(|output| output.text == text)
    })
    .await;
}

/// Synthetic supervisor lines among `events`.
pub fn notices(events: &[SupervisorEvent]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(SupervisorEvent::as_output)
        .filter(|output| output.is_synthetic())
        .map(|output| (output.text.clone(), output.is_error))
        .collect()
}

pub fn is_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Poll until `pid` no longer exists.
pub async fn wait_until_gone(pid: u32) -> bool {
    for _ in 0..100 {
        if !is_alive(pid) {
            return true;
        }
        sleep(Duration::from_millis(20)).await;
    }
    false
}
