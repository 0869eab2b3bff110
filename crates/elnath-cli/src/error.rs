//! CLI-specific error types and mappings.
//!
//! Library errors are folded into a few categories, each with its own exit
//! code.

use elnath_core::{PathError, SettingsError};
use elnath_runtime::{ClientLaunchError, ProcessError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process execution error.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Process(_) => 71,  // EX_OSERR
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Io { .. } => Self::Io(err.to_string()),
            SettingsError::Path(PathError::EmptyPath) => Self::Arguments(err.to_string()),
            _ => Self::Config(err.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        SettingsError::from(err).into()
    }
}

impl From<ProcessError> for CliError {
    fn from(err: ProcessError) -> Self {
        Self::Process(err.to_string())
    }
}

impl From<ClientLaunchError> for CliError {
    fn from(err: ClientLaunchError) -> Self {
        match err {
            ClientLaunchError::Invalid(settings) => settings.into(),
            ClientLaunchError::SetupNotFound(_) => Self::Config(err.to_string()),
            ClientLaunchError::Launch { .. } => Self::Process(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Io(String::new()).exit_code(), 74);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(CliError::Process(String::new()).exit_code(), 71);
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let err: CliError = SettingsError::RootDirNotFound(PathBuf::from("/nope")).into();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn empty_path_is_a_usage_error() {
        let err: CliError = PathError::EmptyPath.into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn launch_failure_is_a_process_error() {
        let err: CliError = ClientLaunchError::Launch {
            path: PathBuf::from("/games/client"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(err.exit_code(), 71);
    }
}
