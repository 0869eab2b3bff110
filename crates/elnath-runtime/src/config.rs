//! Supervisor configuration.
//!
//! The engine never reads settings files; front ends build a
//! [`SupervisorConfig`] from whatever they persist and hand it over.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use elnath_core::{Role, executable_file_name};

/// Time a process gets to exit after the termination request.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(1500);

/// Time allowed for a forced kill to be confirmed.
pub const DEFAULT_KILL_TIMEOUT: Duration = Duration::from_millis(3000);

/// Pause between the stop and start halves of a restart.
pub const DEFAULT_RESTART_SETTLE: Duration = Duration::from_millis(500);

/// Buffered events per subscriber before the slowest one starts lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Two-phase termination windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownPolicy {
    /// Wait after the polite termination request.
    pub grace: Duration,
    /// Wait after the forced kill. Zero sends the kill without confirming it.
    pub kill_timeout: Duration,
}

impl ShutdownPolicy {
    pub const fn new(grace: Duration, kill_timeout: Duration) -> Self {
        Self {
            grace,
            kill_timeout,
        }
    }

    /// Upper bound on how long a stop can block.
    pub fn total(&self) -> Duration {
        self.grace + self.kill_timeout
    }
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE, DEFAULT_KILL_TIMEOUT)
    }
}

/// Everything the supervisor needs to run the three roles.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    root_dir: PathBuf,
    executables: BTreeMap<Role, String>,
    shutdown: ShutdownPolicy,
    restart_settle: Duration,
    event_capacity: usize,
}

impl SupervisorConfig {
    /// Configuration rooted at `root_dir`, with default executable names.
    ///
    /// Relative roots are resolved against the current directory so that
    /// children see the same working directory however the caller moves.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let root_dir = std::path::absolute(&root_dir).unwrap_or(root_dir);
        Self {
            root_dir,
            executables: Role::ALL
                .into_iter()
                .map(|role| (role, role.default_executable_stem().to_string()))
                .collect(),
            shutdown: ShutdownPolicy::default(),
            restart_settle: DEFAULT_RESTART_SETTLE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Override the executable stem for one role (platform suffix is appended).
    #[must_use]
    pub fn with_executable(mut self, role: Role, stem: impl Into<String>) -> Self {
        self.executables.insert(role, stem.into());
        self
    }

    #[must_use]
    pub const fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown = policy;
        self
    }

    #[must_use]
    pub const fn with_restart_settle(mut self, settle: Duration) -> Self {
        self.restart_settle = settle;
        self
    }

    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Full path of a role's executable.
    pub fn executable_path(&self, role: Role) -> PathBuf {
        let stem = self
            .executables
            .get(&role)
            .map_or(role.default_executable_stem(), String::as_str);
        self.root_dir.join(executable_file_name(stem))
    }

    pub const fn shutdown_policy(&self) -> ShutdownPolicy {
        self.shutdown
    }

    pub const fn restart_settle(&self) -> Duration {
        self.restart_settle
    }

    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}
