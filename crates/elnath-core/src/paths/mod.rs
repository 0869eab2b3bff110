//! Path utilities for elnath data directories and server executables.
//!
//! - Data root (settings file, log files)
//! - Server executable names with the platform extension
//!
//! Returns `PathBuf` and `PathError`; no interactive I/O.

mod error;
mod executables;
mod platform;

use std::path::PathBuf;

pub use error::PathError;
pub use executables::{executable_file_name, role_executable_path};
pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};

/// File name of the persisted settings record.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Location of the settings file under the data root.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(SETTINGS_FILE_NAME))
}

/// Directory holding the daily log files; created on demand.
pub fn logs_dir() -> Result<PathBuf, PathError> {
    let dir = data_root()?.join("logs");
    platform::ensure_dir(&dir)?;
    Ok(dir)
}
