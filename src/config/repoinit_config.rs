//! repoinit configuration file handling
//!
//! Optional YAML file at `<app data dir>/config.yaml`. Every field has a
//! default so the file only needs the values a user wants to change.

use crate::storage::AppDirectory;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file inside the app data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application name used for the data directory when none is given
pub const DEFAULT_APP_NAME: &str = "github_repo_creation";

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_gitignore_api_url() -> String {
    "https://www.toptal.com/developers/gitignore/api".to_string()
}

fn default_private() -> bool {
    true
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "initial commit".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_credential_file() -> String {
    "auth_token.json".to_string()
}

/// repoinit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInitConfig {
    /// REST API base URL of the hosting provider
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the ignore-template service; topics are appended as a path segment
    #[serde(default = "default_gitignore_api_url")]
    pub gitignore_api_url: String,

    /// Create repositories as private
    #[serde(default = "default_private")]
    pub private: bool,

    /// Branch the initial commit is pushed to
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Name of the remote pointing at the new repository
    #[serde(default = "default_remote_name")]
    pub remote_name: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Credential document file name inside the app data directory
    #[serde(default = "default_credential_file")]
    pub credential_file: String,
}

impl RepoInitConfig {
    pub fn new() -> Self {
        Self {
            api_url: default_api_url(),
            gitignore_api_url: default_gitignore_api_url(),
            private: default_private(),
            default_branch: default_branch(),
            remote_name: default_remote_name(),
            commit_message: default_commit_message(),
            request_timeout_secs: default_request_timeout_secs(),
            credential_file: default_credential_file(),
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::RepoInitError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading repoinit configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;

        tracing::debug!(
            api_url = %config.api_url,
            private = config.private,
            branch = %config.default_branch,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load from the app data directory, falling back to defaults when absent
    pub fn load_or_default(app_dir: &AppDirectory) -> Result<Self> {
        let path = Self::default_path(app_dir);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::new())
        }
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving repoinit configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// `<app data dir>/config.yaml`
    pub fn default_path(app_dir: &AppDirectory) -> PathBuf {
        app_dir.file(CONFIG_FILE_NAME)
    }

    /// Location of the credential document
    pub fn credential_path(&self, app_dir: &AppDirectory) -> PathBuf {
        app_dir.file(&self.credential_file)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values that would only fail later, mid-workflow
    pub fn validate(&self) -> Result<()> {
        let url_fields = [
            ("api_url", &self.api_url),
            ("gitignore_api_url", &self.gitignore_api_url),
        ];
        for (field, value) in url_fields {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(crate::RepoInitError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, value
                )));
            }
        }

        let name_fields = [
            ("default_branch", &self.default_branch),
            ("remote_name", &self.remote_name),
            ("commit_message", &self.commit_message),
            ("credential_file", &self.credential_file),
        ];
        for (field, value) in name_fields {
            if value.trim().is_empty() {
                return Err(crate::RepoInitError::Config(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(crate::RepoInitError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for RepoInitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_defaults() {
        let config = RepoInitConfig::new();
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.private);
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.remote_name, "origin");
        assert_eq!(config.commit_message, "initial commit");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let mut config = RepoInitConfig::new();
        config.private = false;
        config.default_branch = "trunk".to_string();

        config.save(path).unwrap();

        let loaded = RepoInitConfig::load(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "private: false\n").unwrap();

        let loaded = RepoInitConfig::load(temp_file.path()).unwrap();
        assert!(!loaded.private);
        assert_eq!(loaded.api_url, "https://api.github.com");
        assert_eq!(loaded.credential_file, "auth_token.json");
    }

    #[test]
    fn test_load_missing_file() {
        let result = RepoInitConfig::load("/nonexistent/config.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "api_url: ftp://example.com\n").unwrap();
        assert!(RepoInitConfig::load(temp_file.path()).is_err());

        fs::write(temp_file.path(), "request_timeout_secs: 0\n").unwrap();
        assert!(RepoInitConfig::load(temp_file.path()).is_err());

        fs::write(temp_file.path(), "default_branch: ''\n").unwrap();
        assert!(RepoInitConfig::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_and_paths() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("alice");
        fs::create_dir(&home).unwrap();
        let app_dir = AppDirectory::resolve_in(&home, "demo").unwrap();

        let config = RepoInitConfig::load_or_default(&app_dir).unwrap();
        assert_eq!(config, RepoInitConfig::new());
        assert_eq!(
            config.credential_path(&app_dir),
            home.join(".alice_data/demo/auth_token.json")
        );

        let mut custom = RepoInitConfig::new();
        custom.remote_name = "upstream".to_string();
        custom.save(RepoInitConfig::default_path(&app_dir)).unwrap();

        let loaded = RepoInitConfig::load_or_default(&app_dir).unwrap();
        assert_eq!(loaded.remote_name, "upstream");
    }
}
