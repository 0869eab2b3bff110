//! Settings record and its JSON store.
//!
//! The record holds exactly two fields: the server root directory and the
//! client executable. It is persisted as human-readable JSON and reloaded
//! verbatim on the next run. Persistence lives here, outside the supervision
//! engine, which only ever receives explicit configuration values.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::paths::{PathError, settings_path};

/// Persisted operator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory containing the three server executables.
    #[serde(rename = "rootDirectoryPath")]
    pub root_dir: Option<PathBuf>,

    /// Client executable launched fire-and-forget.
    #[serde(rename = "clientExecutablePath")]
    pub client_path: Option<PathBuf>,
}

impl Settings {
    /// Apply a partial update, only touching fields that are `Some`.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(ref root) = update.root_dir {
            self.root_dir.clone_from(root);
        }
        if let Some(ref client) = update.client_path {
            self.client_path.clone_from(client);
        }
    }
}

/// Partial settings update.
///
/// - `None` = don't change this field
/// - `Some(None)` = clear the field
/// - `Some(Some(value))` = set the field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub root_dir: Option<Option<PathBuf>>,
    pub client_path: Option<Option<PathBuf>>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.root_dir.is_none() && self.client_path.is_none()
    }
}

/// Settings load/save and path validation errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Root directory not found: {0}")]
    RootDirNotFound(PathBuf),

    #[error("{0} exists but is not a directory")]
    RootNotADirectory(PathBuf),

    #[error("Root directory {root} is missing server executables: {}", display_paths(.missing))]
    MissingExecutables { root: PathBuf, missing: Vec<PathBuf> },

    #[error("Client executable not found: {0}")]
    ClientNotFound(PathBuf),

    #[error("Client path is not an executable file: {0}")]
    ClientNotExecutable(PathBuf),

    #[error(transparent)]
    Path(#[from] PathError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON file backing the settings record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data root>/settings.json`.
    pub fn at_default_location() -> Result<Self, SettingsError> {
        Ok(Self::new(settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load settings, falling back to defaults when the file cannot be read.
    ///
    /// The failure is logged so the operator can repair the file.
    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        })
    }

    /// Write settings as pretty JSON, creating the parent directory.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;

        fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

        let settings = Settings {
            root_dir: Some(PathBuf::from("/srv/auriga")),
            client_path: Some(PathBuf::from("/games/ro/client.exe")),
        };
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn file_uses_readable_keys() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store
            .save(&Settings {
                root_dir: Some(PathBuf::from("/srv/auriga")),
                client_path: None,
            })
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"rootDirectoryPath\""));
        assert!(raw.contains("\"clientExecutablePath\""));
        assert!(raw.contains('\n'));
    }

    #[test]
    fn corrupt_file_is_reported_and_defaults_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(&path);

        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
        assert_eq!(store.load_or_default(), Settings::default());
    }

    #[test]
    fn unknown_and_missing_fields_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "rootDirectoryPath": "/srv", "theme": "dark" }"#).unwrap();

        let loaded = SettingsStore::new(&path).load().unwrap();
        assert_eq!(loaded.root_dir, Some(PathBuf::from("/srv")));
        assert_eq!(loaded.client_path, None);
    }

    #[test]
    fn merge_only_touches_some_fields() {
        let mut settings = Settings {
            root_dir: Some(PathBuf::from("/old")),
            client_path: Some(PathBuf::from("/client")),
        };
        settings.merge(&SettingsUpdate {
            root_dir: Some(Some(PathBuf::from("/new"))),
            client_path: None,
        });
        assert_eq!(settings.root_dir, Some(PathBuf::from("/new")));
        assert_eq!(settings.client_path, Some(PathBuf::from("/client")));

        settings.merge(&SettingsUpdate {
            root_dir: None,
            client_path: Some(None),
        });
        assert_eq!(settings.client_path, None);
    }
}
