//! Error types for repoinit
//!
//! One enum covers every failure the bootstrap can hit, so each component
//! returns a `Result` and the provisioning workflow decides what is fatal.
//! Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repoinit operations
pub type Result<T> = std::result::Result<T, RepoInitError>;

/// Comprehensive error type for repoinit operations
#[derive(Error, Debug)]
pub enum RepoInitError {
    /// The user's home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeNotFound,

    /// The per-user app data directory could not be created
    #[error("Failed to create app data directory {path}: {source}")]
    AppDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credential document problems (empty, missing token, unsupported)
    #[error("Credential error: {0}")]
    Credential(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosting provider rejected the token
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The hosting provider is throttling requests
    #[error("Rate limited by the hosting provider")]
    RateLimited,

    /// Non-success response that has no more specific kind
    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Network unreachable, TLS failure, timeout
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// git subprocess errors (including git not being installed)
    #[error("Git error: {0}")]
    Git(#[from] gitcmd::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// A workflow stage could not complete
    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    /// The user cancelled
    #[error("Aborted: {0}")]
    Aborted(String),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl RepoInitError {
    /// True for failures caused by git being absent rather than by a git command
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, RepoInitError::Git(e) if e.is_not_installed())
    }
}
