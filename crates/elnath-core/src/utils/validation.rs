//! Validation of the operator-supplied paths.
//!
//! The root directory must exist and contain the three server executables;
//! the client path must be an existing executable file. Validated paths are
//! what the supervisor and the client launcher receive.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use crate::domain::Role;
use crate::paths::{executable_file_name, role_executable_path};
use crate::settings::SettingsError;

/// File stem of the client's companion setup tool.
pub const SETUP_TOOL_STEM: &str = "Setup";

/// Result of inspecting a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDirReport {
    pub root: PathBuf,
    /// Roles whose executable is present.
    pub present: Vec<(Role, PathBuf)>,
    /// Roles whose executable is missing.
    pub missing: Vec<(Role, PathBuf)>,
}

impl RootDirReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Inspect a root directory without requiring every executable to be present.
pub fn inspect_root_dir(root: &Path) -> Result<RootDirReport, SettingsError> {
    if !root.exists() {
        return Err(SettingsError::RootDirNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(SettingsError::RootNotADirectory(root.to_path_buf()));
    }

    let (present, missing): (Vec<_>, Vec<_>) = Role::ALL
        .iter()
        .map(|&role| (role, role_executable_path(root, role)))
        .partition(|(_, path)| path.is_file());

    Ok(RootDirReport {
        root: root.to_path_buf(),
        present,
        missing,
    })
}

/// Require a root directory that contains every server executable.
pub fn validate_root_dir(root: &Path) -> Result<PathBuf, SettingsError> {
    let report = inspect_root_dir(root)?;
    if report.is_complete() {
        Ok(report.root)
    } else {
        Err(SettingsError::MissingExecutables {
            root: report.root,
            missing: report.missing.into_iter().map(|(_, path)| path).collect(),
        })
    }
}

/// Require an existing client executable.
///
/// On Windows the file must also carry the `.exe` extension.
pub fn validate_client_path(path: &Path) -> Result<PathBuf, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::ClientNotFound(path.to_path_buf()));
    }
    if !path.is_file() || !has_executable_extension(path) {
        return Err(SettingsError::ClientNotExecutable(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

fn has_executable_extension(path: &Path) -> bool {
    let suffix = EXE_SUFFIX.trim_start_matches('.');
    suffix.is_empty()
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(suffix))
}

/// The companion setup tool next to the client, when it exists.
pub fn setup_tool_path(client: &Path) -> Option<PathBuf> {
    let candidate = client
        .parent()?
        .join(executable_file_name(SETUP_TOOL_STEM));
    candidate.is_file().then_some(candidate)
}
