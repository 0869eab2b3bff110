//! Server executable naming.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use crate::domain::Role;

/// Append the platform executable extension (`.exe` on Windows) to a stem.
///
/// A stem that already carries the extension is returned unchanged.
pub fn executable_file_name(stem: &str) -> String {
    if EXE_SUFFIX.is_empty() || stem.to_ascii_lowercase().ends_with(EXE_SUFFIX) {
        stem.to_string()
    } else {
        format!("{stem}{EXE_SUFFIX}")
    }
}

/// Default executable location for `role` inside `root`.
pub fn role_executable_path(root: &Path, role: Role) -> PathBuf {
    root.join(executable_file_name(role.default_executable_stem()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_platform_suffix() {
        let name = executable_file_name("map-server");
        assert_eq!(name, format!("map-server{EXE_SUFFIX}"));
    }

    #[test]
    fn suffix_is_not_doubled() {
        let once = executable_file_name("char-server");
        assert_eq!(executable_file_name(&once), once);
    }

    #[test]
    fn role_path_joins_root() {
        let path = role_executable_path(Path::new("/srv/auriga"), Role::Login);
        assert!(path.starts_with("/srv/auriga"));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("login-server")
        );
    }
}
