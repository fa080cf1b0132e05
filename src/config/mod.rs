//! Configuration system
//!
//! Loads `~/.{user}_data/{app}/config.yaml` with support for:
//! - Hosting provider and ignore-template service URLs
//! - Repository visibility, branch, remote and commit defaults
//! - HTTP timeouts and the credential file name

mod repoinit_config;

pub use repoinit_config::{RepoInitConfig, CONFIG_FILE_NAME, DEFAULT_APP_NAME};
