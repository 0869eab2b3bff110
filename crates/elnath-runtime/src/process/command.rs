//! Command construction for supervised server processes.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Build the command for a server executable.
///
/// Output is piped for capture, stdin is closed, and no console window is
/// created on Windows. On Unix the child leads its own process group so a
/// stop reaches everything it spawned. The child is killed if its handle is
/// dropped without a stop.
pub fn server_command(executable: &Path, working_dir: &Path) -> Command {
    let mut cmd = Command::new(executable);
    cmd.current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    cmd
}

/// Build a detached command with no captured output.
pub fn detached_command(executable: &Path, working_dir: &Path) -> Command {
    let mut cmd = Command::new(executable);
    cmd.current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // Keep terminal signals aimed at the supervisor away from it.
    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}
