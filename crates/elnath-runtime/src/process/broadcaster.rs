//! Supervisor event broadcasting.
//!
//! Every subscriber gets its own copy of each event. A subscriber that falls
//! more than the channel capacity behind loses the oldest events and sees a
//! `Lagged` error on its next receive; other subscribers are unaffected.

use elnath_core::SupervisorEvent;
use tokio::sync::broadcast;
use tracing::trace;

use crate::config::DEFAULT_EVENT_CAPACITY;

/// Fan-out of supervisor events to any number of observers.
#[derive(Debug)]
pub struct SupervisorEventBroadcaster {
    sender: broadcast::Sender<SupervisorEvent>,
}

impl SupervisorEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcast an event to all current subscribers
    pub fn broadcast(&self, event: SupervisorEvent) {
        // Events with no audience are dropped.
        if self.sender.receiver_count() > 0 {
            trace!(?event, "Broadcasting supervisor event");
            let _ = self.sender.send(event);
        }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SupervisorEventBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
