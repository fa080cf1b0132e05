//! repoinit - Bootstrap a new repository in one run
//!
//! repoinit creates a repository on GitHub, turns the current directory into
//! a git repository, optionally drops in a `.gitignore` generated from a
//! template service, and pushes the initial commit.
//!
//! # Architecture
//!
//! - **storage**: Per-user app data directory and the JSON credential document
//! - **config**: YAML configuration with defaults for every field
//! - **integrations**: Hosting provider capability set (GitHub) and template service
//! - **provisioning**: The staged bootstrap workflow and its local git steps
//! - **style**: Terminal markers for progress lines

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

// Components
pub mod integrations;
pub mod provisioning;
pub mod style;

// Re-exports
pub use error::{RepoInitError, Result};
