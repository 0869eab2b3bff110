//! Per-process run state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    /// No OS process is associated with the role.
    Stopped,
    /// Launch requested, OS has not yet accepted it.
    Starting,
    /// The OS process is alive.
    Running,
    /// Termination requested, waiting for the OS to confirm exit.
    Stopping,
    /// The last launch or forced termination failed.
    Errored,
}

impl ProcessState {
    /// Whether a start request should be treated as already satisfied.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Stopping)
    }

    /// Whether an OS process id accompanies this state.
    pub const fn has_pid(self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State plus the OS process id, kept consistent by construction.
///
/// `pid` is `Some` exactly when `state` is `Running` or `Stopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    state: ProcessState,
    pid: Option<u32>,
}

impl ProcessStatus {
    pub const fn stopped() -> Self {
        Self {
            state: ProcessState::Stopped,
            pid: None,
        }
    }

    pub const fn starting() -> Self {
        Self {
            state: ProcessState::Starting,
            pid: None,
        }
    }

    pub const fn running(pid: u32) -> Self {
        Self {
            state: ProcessState::Running,
            pid: Some(pid),
        }
    }

    pub const fn stopping(pid: u32) -> Self {
        Self {
            state: ProcessState::Stopping,
            pid: Some(pid),
        }
    }

    pub const fn errored() -> Self {
        Self {
            state: ProcessState::Errored,
            pid: None,
        }
    }

    pub const fn state(&self) -> ProcessState {
        self.state
    }

    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }
}

impl Default for ProcessStatus {
    fn default() -> Self {
        Self::stopped()
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "{} (pid {pid})", self.state),
            None => write!(f, "{}", self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_present_only_while_running_or_stopping() {
        let all = [
            ProcessStatus::stopped(),
            ProcessStatus::starting(),
            ProcessStatus::running(10),
            ProcessStatus::stopping(10),
            ProcessStatus::errored(),
        ];
        for status in all {
            assert_eq!(status.pid().is_some(), status.state().has_pid(), "{status}");
        }
    }

    #[test]
    fn active_states() {
        assert!(ProcessState::Running.is_active());
        assert!(ProcessState::Starting.is_active());
        assert!(!ProcessState::Stopped.is_active());
        assert!(!ProcessState::Errored.is_active());
    }

    #[test]
    fn display_includes_pid() {
        assert_eq!(ProcessStatus::running(42).to_string(), "running (pid 42)");
        assert_eq!(ProcessStatus::stopped().to_string(), "stopped");
    }
}
