//! External Integrations
//!
//! Adapters for the services a bootstrap talks to over HTTP.
//!
//! # Built-in Integrations
//!
//! - **GitHub**: REST adapter implementing the [`RepoHost`] capability set
//! - **gitignore templates**: gitignore.io-compatible template service
//!
//! Providers only implement the raw calls; [`RepoHost::create_repository`]
//! and [`RepoHost::delete_repository`] map them onto shared outcomes.

pub mod github;
pub mod gitignore;
pub mod host;

pub use github::{GitHubClient, GitHubConnector};
pub use gitignore::{template_url, GitignoreService, TemplateFetch, TemplateSource};
pub use host::{
    ApiFailure, CreateOutcome, CreateRepoRequest, DeleteOutcome, HostConnector, OwnerIdentity,
    RepoHost, RepoListing, RepoSummary, Submission,
};
