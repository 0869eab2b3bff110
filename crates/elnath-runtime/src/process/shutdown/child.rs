//! Two-phase shutdown for `tokio::process::Child`: polite request, then forced kill.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::timeout;

use crate::config::ShutdownPolicy;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{Signal, killpg};
#[cfg(unix)]
use nix::unistd::Pid;

/// How a shutdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Exited within the grace window.
    Graceful(ExitStatus),
    /// Exited after the forced kill.
    Killed(ExitStatus),
    /// Still not reaped when the kill window elapsed.
    Unconfirmed,
}

/// Shut down a child, escalating to a forced kill if it ignores the request.
///
/// # Strategy
/// 1. Send SIGTERM to the child's process group and wait up to `policy.grace`
/// 2. If still running, call `on_escalate` and SIGKILL the group
/// 3. Wait up to `policy.kill_timeout` for reaping; a zero window skips
///    the wait and reports [`ShutdownOutcome::Unconfirmed`]
///
/// # Platform behavior
/// - Unix: signals go to the whole process group the child leads
/// - Windows: no polite request exists, so the child is killed immediately
///
/// # Returns
/// - `Err` if a signal could not be delivered or waiting failed
pub async fn shutdown_child(
    child: &mut Child,
    policy: ShutdownPolicy,
    on_escalate: impl FnOnce(),
) -> io::Result<ShutdownOutcome> {
    #[cfg(unix)]
    {
        let Some(pid) = child.id() else {
            // Already reaped.
            return child.wait().await.map(ShutdownOutcome::Graceful);
        };

        match killpg(group_of(pid)?, Signal::SIGTERM) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return child.wait().await.map(ShutdownOutcome::Graceful),
            Err(e) => return Err(io::Error::other(e)),
        }

        if let Ok(result) = timeout(policy.grace, child.wait()).await {
            return result.map(ShutdownOutcome::Graceful);
        }
    }

    on_escalate();
    force_kill(child, policy.kill_timeout).await
}

async fn force_kill(child: &mut Child, kill_timeout: Duration) -> io::Result<ShutdownOutcome> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        match killpg(group_of(pid)?, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => return Err(io::Error::other(e)),
        }
    }

    #[cfg(not(unix))]
    if child.id().is_some() {
        child.start_kill()?;
    }

    // A zero window sends the kill without waiting to confirm it.
    if kill_timeout.is_zero() {
        return Ok(ShutdownOutcome::Unconfirmed);
    }

    match timeout(kill_timeout, child.wait()).await {
        Ok(result) => result.map(ShutdownOutcome::Killed),
        Err(_) => Ok(ShutdownOutcome::Unconfirmed),
    }
}

/// Kill whatever is left of a process group after its leader exited.
///
/// Grandchildren that outlive the server would otherwise keep its ports.
///
/// Runs right after the leader is reaped. While any member is left the
/// group id stays reserved and cannot name another group. With no member
/// left the signal could only reach a new group if the kernel handed the
/// leader's pid to a fresh group leader in between, which needs the pid
/// counter to wrap around first; ESRCH is the expected result then.
pub fn sweep_group(pid: u32) {
    #[cfg(unix)]
    if let Ok(group) = group_of(pid) {
        // ESRCH is the common case: nothing left.
        let _ = killpg(group, Signal::SIGKILL);
    }

    #[cfg(not(unix))]
    let _ = pid;
}

#[cfg(unix)]
fn group_of(pid: u32) -> io::Result<Pid> {
    i32::try_from(pid)
        .map(Pid::from_raw)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))
}
