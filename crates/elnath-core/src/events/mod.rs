//! Supervisor events for real-time rendering.
//!
//! These events are emitted by the supervision engine and consumed by
//! whatever front end is attached (the CLI session, tests, loggers). Consumers
//! should treat them as the sole source of truth for per-role output and
//! lifecycle.
//!
//! # Wire Format
//!
//! Events serialize with a `type` tag:
//!
//! ```json
//! { "type": "output", "role": "map", "text": "listening", "isError": false, ... }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ProcessStatus, Role};

/// Where an output line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSource {
    /// Child's standard output.
    Stdout,
    /// Child's standard error.
    Stderr,
    /// Synthetic status line written by the supervisor itself
    /// (started, stopped, exit code, diagnostics).
    Supervisor,
}

/// One line of captured output or one synthetic status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputEvent {
    pub role: Role,
    pub text: String,
    /// `true` for stderr lines and for supervisor diagnostics reporting a failure.
    pub is_error: bool,
    pub source: OutputSource,
    pub timestamp: DateTime<Utc>,
}

impl OutputEvent {
    /// A line the child wrote to stdout or stderr.
    pub fn line(role: Role, text: impl Into<String>, is_stderr: bool) -> Self {
        Self {
            role,
            text: text.into(),
            is_error: is_stderr,
            source: if is_stderr {
                OutputSource::Stderr
            } else {
                OutputSource::Stdout
            },
            timestamp: Utc::now(),
        }
    }

    /// A synthetic line describing a lifecycle milestone or failure.
    pub fn status(role: Role, text: impl Into<String>, is_error: bool) -> Self {
        Self {
            role,
            text: text.into(),
            is_error,
            source: OutputSource::Supervisor,
            timestamp: Utc::now(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == OutputSource::Supervisor
    }
}

/// A role's state changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    pub role: Role,
    pub status: ProcessStatus,
    pub timestamp: DateTime<Utc>,
}

impl StateChange {
    pub fn new(role: Role, status: ProcessStatus) -> Self {
        Self {
            role,
            status,
            timestamp: Utc::now(),
        }
    }
}

/// Everything a supervisor subscriber can observe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupervisorEvent {
    /// Captured output or a synthetic status line.
    Output(OutputEvent),
    /// Lifecycle state transition.
    StateChanged(StateChange),
}

impl SupervisorEvent {
    /// Role that produced this event.
    pub const fn role(&self) -> Role {
        match self {
            Self::Output(output) => output.role,
            Self::StateChanged(change) => change.role,
        }
    }

    pub const fn as_output(&self) -> Option<&OutputEvent> {
        match self {
            Self::Output(output) => Some(output),
            Self::StateChanged(_) => None,
        }
    }
}

impl From<OutputEvent> for SupervisorEvent {
    fn from(event: OutputEvent) -> Self {
        Self::Output(event)
    }
}

impl From<StateChange> for SupervisorEvent {
    fn from(change: StateChange) -> Self {
        Self::StateChanged(change)
    }
}
