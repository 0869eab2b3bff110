//! Fire-and-forget launch of the game client and its setup tool.
//!
//! Neither program is supervised: no output is captured and no lifecycle is
//! tracked. The child is detached from the supervisor's process group so
//! it survives the supervisor being interrupted.

use std::path::{Path, PathBuf};

use elnath_core::{SettingsError, setup_tool_path, validate_client_path};
use thiserror::Error;
use tracing::info;

use crate::process::detached_command;

#[derive(Debug, Error)]
pub enum ClientLaunchError {
    #[error(transparent)]
    Invalid(#[from] SettingsError),

    #[error("No setup tool found next to {}", .0.display())]
    SetupNotFound(PathBuf),

    #[error("Failed to launch {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Launch the client. Returns its pid when the OS reports one.
pub fn launch_client(client: &Path) -> Result<Option<u32>, ClientLaunchError> {
    let client = validate_client_path(client)?;
    spawn_detached(&client)
}

/// Launch the setup tool that sits next to the client.
pub fn launch_client_setup(client: &Path) -> Result<Option<u32>, ClientLaunchError> {
    let client = validate_client_path(client)?;
    let setup =
        setup_tool_path(&client).ok_or_else(|| ClientLaunchError::SetupNotFound(client.clone()))?;
    spawn_detached(&setup)
}

fn spawn_detached(path: &Path) -> Result<Option<u32>, ClientLaunchError> {
    let working_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let child = detached_command(path, working_dir)
        .spawn()
        .map_err(|source| ClientLaunchError::Launch {
            path: path.to_path_buf(),
            source,
        })?;

    let pid = child.id();
    info!(path = %path.display(), ?pid, "Launched detached program");
    // Dropping the handle detaches; the runtime reaps it on exit.
    Ok(pid)
}
