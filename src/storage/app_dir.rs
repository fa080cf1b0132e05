//! Per-user application data directory
//!
//! State lives under `~/.{user}_data/{app_name}`, where `user` is the last
//! segment of the home directory path.

use crate::{RepoInitError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved locations for persisted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDirectory {
    /// User name taken from the home directory
    pub user: String,
    /// Home directory
    pub home: PathBuf,
    /// `~/.{user}_data`
    pub data_dir: PathBuf,
    /// `~/.{user}_data/{app_name}`
    pub app_data_dir: PathBuf,
}

impl AppDirectory {
    /// Resolve and create the app directory under the current user's home
    pub fn resolve(app_name: &str) -> Result<Self> {
        let home = dirs::home_dir().ok_or(RepoInitError::HomeNotFound)?;
        Self::resolve_in(home, app_name)
    }

    /// Resolve and create the app directory under an explicit home directory.
    ///
    /// Idempotent: existing directories are left untouched.
    pub fn resolve_in(home: impl Into<PathBuf>, app_name: &str) -> Result<Self> {
        let dir = Self::locate(home, app_name)?;
        create_if_missing(&dir.data_dir)?;
        create_if_missing(&dir.app_data_dir)?;

        tracing::debug!(
            user = %dir.user,
            app_data_dir = %dir.app_data_dir.display(),
            "App data directory ready"
        );

        Ok(dir)
    }

    /// Compute the paths without touching the filesystem
    pub fn locate(home: impl Into<PathBuf>, app_name: &str) -> Result<Self> {
        let home = home.into();

        if app_name.is_empty() || app_name.contains(['/', '\\']) || app_name == ".." {
            return Err(RepoInitError::Config(format!(
                "Invalid app name '{}': must be a single path segment",
                app_name
            )));
        }

        let user = home
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                RepoInitError::Config(format!(
                    "Cannot derive a user name from home directory {}",
                    home.display()
                ))
            })?;

        let data_dir = home.join(format!(".{}_data", user));
        let app_data_dir = data_dir.join(app_name);

        Ok(Self {
            user,
            home,
            data_dir,
            app_data_dir,
        })
    }

    /// True when the full directory tree exists
    pub fn is_created(&self) -> bool {
        self.data_dir.is_dir() && self.app_data_dir.is_dir()
    }

    /// Path of a file inside the app data directory
    pub fn file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.app_data_dir.join(name)
    }
}

fn create_if_missing(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    match fs::create_dir(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Created directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(RepoInitError::AppDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_paths() {
        let dir = AppDirectory::locate("/home/alice", "demo").unwrap();
        assert_eq!(dir.user, "alice");
        assert_eq!(dir.home, PathBuf::from("/home/alice"));
        assert_eq!(dir.data_dir, PathBuf::from("/home/alice/.alice_data"));
        assert_eq!(dir.app_data_dir, PathBuf::from("/home/alice/.alice_data/demo"));
        assert_eq!(
            dir.file("auth_token.json"),
            PathBuf::from("/home/alice/.alice_data/demo/auth_token.json")
        );
    }

    #[test]
    fn test_resolve_creates_both_levels() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("alice");
        fs::create_dir(&home).unwrap();

        let dir = AppDirectory::resolve_in(&home, "demo").unwrap();
        assert!(dir.is_created());
        assert!(home.join(".alice_data").is_dir());
        assert!(home.join(".alice_data/demo").is_dir());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("bob");
        fs::create_dir(&home).unwrap();

        let first = AppDirectory::resolve_in(&home, "demo").unwrap();
        fs::write(first.file("auth_token.json"), "{}").unwrap();

        let second = AppDirectory::resolve_in(&home, "demo").unwrap();
        assert!(first.is_created());
        assert!(second.is_created());
        assert_eq!(first, second);
        assert!(second.file("auth_token.json").exists());
    }

    #[test]
    fn test_resolve_fails_when_home_missing() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("nobody");

        let err = AppDirectory::resolve_in(&home, "demo").unwrap_err();
        assert!(matches!(err, RepoInitError::AppDirectory { .. }));
    }

    #[test]
    fn test_resolve_fails_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("carol");
        fs::create_dir(&home).unwrap();
        fs::write(home.join(".carol_data"), "not a directory").unwrap();

        let err = AppDirectory::resolve_in(&home, "demo").unwrap_err();
        assert!(matches!(err, RepoInitError::AppDirectory { .. }));
    }

    #[test]
    fn test_invalid_app_name() {
        assert!(AppDirectory::locate("/home/alice", "").is_err());
        assert!(AppDirectory::locate("/home/alice", "a/b").is_err());
        assert!(AppDirectory::locate("/home/alice", "..").is_err());
    }

    #[test]
    fn test_root_home_has_no_user() {
        assert!(AppDirectory::locate("/", "demo").is_err());
    }
}
