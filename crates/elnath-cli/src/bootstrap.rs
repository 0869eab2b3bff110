//! CLI bootstrap - the composition root.
//!
//! Loads the settings record, applies the command line overrides and hands
//! handlers a [`CliContext`]. Overrides that validate are written back to the
//! settings file; the rest only apply to this run.

use std::path::{Path, PathBuf};

use elnath_core::{
    Settings, SettingsStore, SettingsUpdate, normalize_user_path, validate_client_path,
    validate_root_dir,
};
use elnath_runtime::SupervisorConfig;
use tracing::{debug, info, warn};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Settings file to use instead of the default location.
    pub settings_path: Option<PathBuf>,
    /// `--root-dir` as typed.
    pub root_dir: Option<String>,
    /// `--client-path` as typed.
    pub client_path: Option<String>,
}

/// Settings-backed context for command handlers.
#[derive(Debug)]
pub struct CliContext {
    store: SettingsStore,
    /// Effective settings for this run (stored values plus overrides).
    settings: Settings,
}

impl CliContext {
    pub const fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configured root directory, validated.
    pub fn root_dir(&self) -> Result<PathBuf, CliError> {
        let root = self.settings.root_dir.as_deref().ok_or_else(|| {
            CliError::Config(
                "No server root directory configured. Pass --root-dir or run `elnath config set-root <path>`"
                    .to_string(),
            )
        })?;
        Ok(validate_root_dir(root)?)
    }

    /// The configured client executable, validated.
    pub fn client_path(&self) -> Result<PathBuf, CliError> {
        let client = self.settings.client_path.as_deref().ok_or_else(|| {
            CliError::Config(
                "No client executable configured. Pass --client-path or run `elnath config set-client <path>`"
                    .to_string(),
            )
        })?;
        Ok(validate_client_path(client)?)
    }

    /// Supervisor configuration rooted at the validated root directory.
    pub fn supervisor_config(&self) -> Result<SupervisorConfig, CliError> {
        Ok(SupervisorConfig::new(self.root_dir()?))
    }
}

/// Bootstrap the CLI application.
///
/// 1. Open the settings store (default location unless overridden)
/// 2. Load the record, falling back to defaults if it is unreadable
/// 3. Apply `--root-dir` / `--client-path`, persisting the valid ones
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let store = match config.settings_path {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::at_default_location()?,
    };
    debug!(path = %store.path().display(), "Using settings file");

    let mut settings = store.load_or_default();
    let mut persisted = SettingsUpdate::default();

    if let Some(raw) = config.root_dir.as_deref() {
        let root = normalize_user_path(raw)?;
        if validate_root_dir(&root).is_ok() {
            persisted.root_dir = Some(Some(root.clone()));
        } else {
            warn!(path = %root.display(), "Root directory override is not valid, using it for this run only");
        }
        settings.root_dir = Some(root);
    }

    if let Some(raw) = config.client_path.as_deref() {
        let client = normalize_user_path(raw)?;
        if validate_client_path(&client).is_ok() {
            persisted.client_path = Some(Some(client.clone()));
        } else {
            warn!(path = %client.display(), "Client path override is not valid, using it for this run only");
        }
        settings.client_path = Some(client);
    }

    if !persisted.is_empty() {
        persist(&store, &persisted);
    }

    Ok(CliContext { store, settings })
}

fn persist(store: &SettingsStore, update: &SettingsUpdate) {
    let mut stored = store.load_or_default();
    stored.merge(update);
    match store.save(&stored) {
        Ok(()) => info!(path = %store.path().display(), "Saved command line overrides"),
        Err(e) => warn!(error = %e, "Failed to save command line overrides"),
    }
}

/// Store a validated root directory.
pub fn save_root_dir(store: &SettingsStore, raw: &str) -> Result<PathBuf, CliError> {
    let root = validate_root_dir(&normalize_user_path(raw)?)?;
    save(store, &SettingsUpdate {
        root_dir: Some(Some(root.clone())),
        ..Default::default()
    })?;
    Ok(root)
}

/// Store a validated client executable.
pub fn save_client_path(store: &SettingsStore, raw: &str) -> Result<PathBuf, CliError> {
    let client = validate_client_path(&normalize_user_path(raw)?)?;
    save(store, &SettingsUpdate {
        client_path: Some(Some(client.clone())),
        ..Default::default()
    })?;
    Ok(client)
}

fn save(store: &SettingsStore, update: &SettingsUpdate) -> Result<(), CliError> {
    let mut stored = store.load()?;
    stored.merge(update);
    store.save(&stored)?;
    Ok(())
}

/// Display helper for optional paths.
pub fn display_optional(path: Option<&Path>) -> String {
    path.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use elnath_core::{Role, role_executable_path};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn server_root() -> TempDir {
        let dir = tempdir().unwrap();
        for role in Role::ALL {
            fs::write(role_executable_path(dir.path(), role), b"").unwrap();
        }
        dir
    }

    fn config(settings: &Path) -> CliConfig {
        CliConfig {
            settings_path: Some(settings.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_settings_yield_unconfigured_context() {
        let data = tempdir().unwrap();
        let ctx = bootstrap(config(&data.path().join("settings.json"))).unwrap();
        assert_eq!(ctx.settings(), &Settings::default());
        assert!(matches!(ctx.root_dir(), Err(CliError::Config(_))));
        assert!(matches!(ctx.client_path(), Err(CliError::Config(_))));
    }

    #[test]
    fn valid_root_override_is_persisted() {
        let data = tempdir().unwrap();
        let root = server_root();
        let settings_path = data.path().join("settings.json");

        let ctx = bootstrap(CliConfig {
            root_dir: Some(root.path().display().to_string()),
            ..config(&settings_path)
        })
        .unwrap();
        assert_eq!(ctx.root_dir().unwrap(), root.path());

        let stored = SettingsStore::new(&settings_path).load().unwrap();
        assert_eq!(stored.root_dir.as_deref(), Some(root.path()));
    }

    #[test]
    fn invalid_override_applies_to_this_run_only() {
        let data = tempdir().unwrap();
        let settings_path = data.path().join("settings.json");
        let bogus = data.path().join("no-such-root");

        let ctx = bootstrap(CliConfig {
            root_dir: Some(bogus.display().to_string()),
            ..config(&settings_path)
        })
        .unwrap();
        assert_eq!(ctx.settings().root_dir.as_deref(), Some(bogus.as_path()));
        assert!(ctx.root_dir().is_err());
        assert!(!settings_path.exists());
    }

    #[test]
    fn save_root_rejects_incomplete_directory() {
        let data = tempdir().unwrap();
        let store = SettingsStore::new(data.path().join("settings.json"));
        let empty = tempdir().unwrap();

        let err = save_root_dir(&store, &empty.path().display().to_string()).unwrap_err();
        assert_eq!(err.exit_code(), 78);

        let root = server_root();
        save_root_dir(&store, &root.path().display().to_string()).unwrap();
        assert_eq!(store.load().unwrap().root_dir.as_deref(), Some(root.path()));
    }

    #[test]
    fn supervisor_config_uses_root() {
        let data = tempdir().unwrap();
        let root = server_root();
        let ctx = bootstrap(CliConfig {
            root_dir: Some(root.path().display().to_string()),
            ..config(&data.path().join("settings.json"))
        })
        .unwrap();

        let supervisor = ctx.supervisor_config().unwrap();
        assert_eq!(
            supervisor.executable_path(Role::Char),
            role_executable_path(root.path(), Role::Char)
        );
    }
}
