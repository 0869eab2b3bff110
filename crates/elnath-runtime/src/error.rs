//! Error types for process supervision.
//!
//! Double operations (start on a running role, stop on a stopped one) are not
//! errors; they surface as `Ok(false)` from the lifecycle calls.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use elnath_core::Role;
use thiserror::Error;

/// Failures of a lifecycle operation on one role.
///
/// Every variant has already been reported on the role's output stream by
/// the time it is returned.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The role's executable is not present under the root directory.
    #[error("{} executable not found: {}", role.label(), path.display())]
    ExecutableMissing { role: Role, path: PathBuf },

    /// The OS refused to start the executable.
    #[error("Failed to launch {} ({}): {source}", role.label(), path.display())]
    Launch {
        role: Role,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process survived the forced kill window; the handle was released anyway.
    #[error(
        "{} (pid {pid}) did not confirm exit {} ms after forced kill",
        role.label(),
        waited.as_millis()
    )]
    StopUnconfirmed { role: Role, pid: u32, waited: Duration },

    /// Termination could not be requested or confirmed.
    #[error("Failed to stop {} (pid {pid}): {source}", role.label())]
    Stop {
        role: Role,
        pid: u32,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Role the failed operation targeted.
    pub const fn role(&self) -> Role {
        match self {
            Self::ExecutableMissing { role, .. }
            | Self::Launch { role, .. }
            | Self::StopUnconfirmed { role, .. }
            | Self::Stop { role, .. } => *role,
        }
    }

    /// Whether the failure happened while launching.
    pub const fn is_launch_failure(&self) -> bool {
        matches!(self, Self::ExecutableMissing { .. } | Self::Launch { .. })
    }
}
