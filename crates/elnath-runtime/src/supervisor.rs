//! Supervisor for the login, char and map servers.
//!
//! The supervisor owns at most one [`ProcessHandle`] per role and merges
//! every handle's output and state changes into a single event stream.
//! Operations on different roles run independently; operations on the same
//! role are serialized by a per-role lock, so a stop and a start of the map
//! server can never interleave.
//!
//! [`Supervisor::shutdown`] closes the supervisor: every role is stopped and
//! later starts are refused, including ones already waiting on a role lock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use elnath_core::{ProcessState, ProcessStatus, Role, SupervisorEvent};
use futures_util::future::join_all;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SupervisorConfig;
use crate::error::ProcessError;
use crate::process::{ProcessHandle, RolePublisher, SupervisorEventBroadcaster};

/// Outcome of a lifecycle operation for one role in a batch.
pub type RoleResult = (Role, Result<bool, ProcessError>);

struct RoleSlot {
    handle: Mutex<Option<ProcessHandle>>,
    publisher: RolePublisher,
}

/// Supervises the three server roles.
///
/// Lifecycle operations need a tokio runtime. Dropping the supervisor drops
/// every handle, which stops any process still running in the background;
/// call [`Supervisor::shutdown`] to wait for that instead.
pub struct Supervisor {
    config: SupervisorConfig,
    slots: BTreeMap<Role, RoleSlot>,
    broadcaster: Arc<SupervisorEventBroadcaster>,
    closed: AtomicBool,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let broadcaster = Arc::new(SupervisorEventBroadcaster::new(config.event_capacity()));

        let slots = Role::ALL
            .into_iter()
            .map(|role| {
                let slot = RoleSlot {
                    handle: Mutex::new(None),
                    publisher: RolePublisher::new(role, Arc::clone(&broadcaster)),
                };
                (role, slot)
            })
            .collect();

        debug!(root = %config.root_dir().display(), "Supervisor created");
        Self {
            config,
            slots,
            broadcaster,
            closed: AtomicBool::new(false),
        }
    }

    pub const fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Observe every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.broadcaster.subscribe()
    }

    pub fn status(&self, role: Role) -> ProcessStatus {
        self.slot(role).publisher.status()
    }

    pub fn state(&self, role: Role) -> ProcessState {
        self.status(role).state()
    }

    pub fn pid(&self, role: Role) -> Option<u32> {
        self.status(role).pid()
    }

    pub fn is_running(&self, role: Role) -> bool {
        self.status(role).is_running()
    }

    /// Follow one role's status.
    pub fn watch(&self, role: Role) -> watch::Receiver<ProcessStatus> {
        self.slot(role).publisher.watch()
    }

    /// Whether [`Supervisor::shutdown`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Current status of every role, in role order.
    pub fn snapshot(&self) -> Vec<(Role, ProcessStatus)> {
        Role::ALL
            .into_iter()
            .map(|role| (role, self.status(role)))
            .collect()
    }

    /// Start a role. `Ok(false)` if it was already active or the supervisor
    /// is shut down.
    pub async fn start(&self, role: Role) -> Result<bool, ProcessError> {
        let mut slot = self.slot(role).handle.lock().await;
        if slot.as_ref().is_some_and(ProcessHandle::is_active) {
            debug!(%role, "Start ignored, already active");
            return Ok(false);
        }
        self.launch(role, &mut slot).await
    }

    /// Stop a role. `Ok(false)` if nothing was running.
    ///
    /// The handle is released whatever the outcome.
    pub async fn stop(&self, role: Role) -> Result<bool, ProcessError> {
        let mut slot = self.slot(role).handle.lock().await;
        match slot.take() {
            Some(mut handle) => handle.stop().await,
            None => Ok(false),
        }
    }

    /// Stop the role if it runs, wait the settle delay, then start it.
    ///
    /// A role that was not running is simply started. If the stop fails the
    /// restart is abandoned and the stop error returned.
    pub async fn restart(&self, role: Role) -> Result<bool, ProcessError> {
        let mut slot = self.slot(role).handle.lock().await;

        if let Some(mut handle) = slot.take() {
            match handle.stop().await {
                Ok(true) => sleep(self.config.restart_settle()).await,
                Ok(false) => {}
                Err(e) => {
                    self.slot(role).publisher.notice(
                        format!("Restart of {} abandoned: {e}", role.label()),
                        true,
                    );
                    return Err(e);
                }
            }
        }

        self.launch(role, &mut slot).await
    }

    /// Start every role concurrently.
    pub async fn start_all(&self) -> Vec<RoleResult> {
        join_all(Role::ALL.map(|role| async move { (role, self.start(role).await) })).await
    }

    /// Stop every role concurrently.
    pub async fn stop_all(&self) -> Vec<RoleResult> {
        join_all(Role::ALL.map(|role| async move { (role, self.stop(role).await) })).await
    }

    /// Refuse further starts, then stop everything and wait for it.
    ///
    /// A start that already holds a role lock finishes first and is then
    /// stopped; one still waiting for the lock becomes a no-op.
    pub async fn shutdown(&self) {
        info!("Supervisor shutting down");
        self.closed.store(true, Ordering::SeqCst);
        for (role, result) in self.stop_all().await {
            match result {
                Ok(true) => debug!(%role, "Stopped during shutdown"),
                Ok(false) => {}
                Err(e) => warn!(%role, error = %e, "Failed to stop during shutdown"),
            }
        }
    }

    /// Replace the slot's handle with a freshly started one.
    ///
    /// A handle whose process already exited is released first. A handle
    /// that failed to launch is dropped; the role keeps its `Errored` status.
    /// Called with the role lock held, so a shutdown that has begun is seen.
    async fn launch(
        &self,
        role: Role,
        slot: &mut Option<ProcessHandle>,
    ) -> Result<bool, ProcessError> {
        if let Some(mut finished) = slot.take() {
            let _ = finished.stop().await;
        }
        if self.is_closed() {
            debug!(%role, "Start ignored, supervisor is shut down");
            return Ok(false);
        }

        let mut handle = ProcessHandle::new(
            self.config.executable_path(role),
            self.config.root_dir(),
            self.config.shutdown_policy(),
            self.slot(role).publisher.clone(),
        )
        .with_restart_settle(self.config.restart_settle());

        let started = handle.start().await?;
        *slot = Some(handle);
        Ok(started)
    }

    fn slot(&self, role: Role) -> &RoleSlot {
        // Populated for every role in `new`.
        &self.slots[&role]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_needs_no_runtime() {
        let supervisor = Supervisor::new(SupervisorConfig::new("/srv/auriga"));
        let _events = supervisor.subscribe();

        assert!(!supervisor.is_closed());
        for (role, status) in supervisor.snapshot() {
            assert_eq!(status.state(), ProcessState::Stopped, "{role}");
        }
        assert_eq!(supervisor.pid(Role::Map), None);
    }
}
