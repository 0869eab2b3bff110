//! Per-role status cell and event emitter.
//!
//! Each role owns one [`RolePublisher`] for the supervisor's whole lifetime.
//! Every handle created for the role, together with its reader and monitor
//! tasks, writes through a clone of it. That keeps the last-known status in
//! one place even after a handle is released. Events go straight to the
//! shared broadcaster; sending never waits on subscribers.

use std::sync::Arc;

use elnath_core::{OutputEvent, ProcessStatus, Role, StateChange, SupervisorEvent};
use tokio::sync::watch;

use super::broadcaster::SupervisorEventBroadcaster;

#[derive(Debug, Clone)]
pub struct RolePublisher {
    role: Role,
    status: Arc<watch::Sender<ProcessStatus>>,
    events: Arc<SupervisorEventBroadcaster>,
}

impl RolePublisher {
    /// Create a publisher whose events go to `events`.
    pub fn new(role: Role, events: Arc<SupervisorEventBroadcaster>) -> Self {
        let (status, _) = watch::channel(ProcessStatus::stopped());
        Self {
            role,
            status: Arc::new(status),
            events,
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    /// Last published status.
    pub fn status(&self) -> ProcessStatus {
        *self.status.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<ProcessStatus> {
        self.status.subscribe()
    }

    /// Publish a new status and announce the transition.
    pub(crate) fn set(&self, status: ProcessStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            self.emit(StateChange::new(self.role, status).into());
        }
    }

    /// Forward one line read from the child.
    pub(crate) fn line(&self, text: String, is_stderr: bool) {
        self.emit(OutputEvent::line(self.role, text, is_stderr).into());
    }

    /// Emit a supervisor-generated line on the role's stream.
    pub(crate) fn notice(&self, text: impl Into<String>, is_error: bool) {
        self.emit(OutputEvent::status(self.role, text, is_error).into());
    }

    fn emit(&self, event: SupervisorEvent) {
        self.events.broadcast(event);
    }
}
