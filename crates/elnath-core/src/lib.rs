//! Core domain types for elnath.
//!
//! Pure types shared by the supervision engine and its front ends:
//! server roles and run state, supervisor events, the persisted settings
//! record, path resolution and path validation. Nothing in this crate
//! spawns processes.

pub mod domain;
pub mod events;
pub mod paths;
pub mod settings;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{ParseRoleError, ProcessState, ProcessStatus, Role};
pub use events::{OutputEvent, OutputSource, StateChange, SupervisorEvent};
pub use paths::{
    DATA_DIR_ENV, PathError, SETTINGS_FILE_NAME, data_root, executable_file_name, logs_dir,
    normalize_user_path, role_executable_path, settings_path,
};
pub use settings::{Settings, SettingsError, SettingsStore, SettingsUpdate};
pub use utils::validation::{
    RootDirReport, SETUP_TOOL_STEM, inspect_root_dir, setup_tool_path, validate_client_path,
    validate_root_dir,
};
