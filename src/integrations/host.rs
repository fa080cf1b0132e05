//! Hosting-provider capability set
//!
//! A provider implements four raw calls (identity, list, create, delete).
//! The collision check and the outcome mapping are shared provided methods,
//! so every provider reports the same taxonomy.

use crate::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated account that will own new repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerIdentity {
    pub login: String,
    pub html_url: String,
}

/// Repository entry as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl RepoSummary {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private: true,
            html_url: None,
        }
    }
}

/// Repository creation request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    pub private: bool,
}

/// Result of listing the user's repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoListing {
    Available(Vec<RepoSummary>),
    Unavailable(ApiFailure),
}

/// Result of submitting a creation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Created,
    Rejected(ApiFailure),
}

/// Why the provider refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    Unauthorized,
    Forbidden,
    RateLimited,
    Validation,
    ServerError,
    Unknown,
}

impl ApiFailure {
    /// Classify a non-success HTTP status
    pub fn classify(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiFailure::Unauthorized,
            StatusCode::FORBIDDEN => ApiFailure::Forbidden,
            StatusCode::TOO_MANY_REQUESTS => ApiFailure::RateLimited,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiFailure::Validation,
            s if s.is_server_error() => ApiFailure::ServerError,
            _ => ApiFailure::Unknown,
        }
    }

    /// Classify a response, honoring the provider's rate-limit signal.
    ///
    /// Providers may report an exhausted quota as 403 rather than 429.
    pub fn from_response(status: StatusCode, rate_limit_exhausted: bool) -> Self {
        match status {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if rate_limit_exhausted => {
                ApiFailure::RateLimited
            }
            _ => ApiFailure::classify(status),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Unauthorized => write!(f, "unauthorized"),
            ApiFailure::Forbidden => write!(f, "forbidden"),
            ApiFailure::RateLimited => write!(f, "rate limited"),
            ApiFailure::Validation => write!(f, "validation failed"),
            ApiFailure::ServerError => write!(f, "server error"),
            ApiFailure::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of [`RepoHost::create_repository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    NameExists,
    CreationFailed(ApiFailure),
    ListUnavailable(ApiFailure),
}

impl CreateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CreateOutcome::Created)
    }

    pub fn message(&self) -> &'static str {
        match self {
            CreateOutcome::Created => "repo created",
            CreateOutcome::NameExists => "repo exists",
            CreateOutcome::CreationFailed(_) => "repo creation failed",
            CreateOutcome::ListUnavailable(_) => "github data not accessible",
        }
    }

    /// Failure class, for the outcomes that carry one
    pub fn failure(&self) -> Option<ApiFailure> {
        match self {
            CreateOutcome::CreationFailed(f) | CreateOutcome::ListUnavailable(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for CreateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure() {
            Some(failure) => write!(f, "{} ({})", self.message(), failure),
            None => write!(f, "{}", self.message()),
        }
    }
}

/// Outcome of [`RepoHost::delete_repository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Forbidden,
    Unknown(StatusCode),
}

impl DeleteOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NO_CONTENT => DeleteOutcome::Deleted,
            StatusCode::NOT_FOUND => DeleteOutcome::NotFound,
            StatusCode::FORBIDDEN => DeleteOutcome::Forbidden,
            other => DeleteOutcome::Unknown(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }

    pub fn message(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "repo deleted",
            DeleteOutcome::NotFound => "repo not found",
            DeleteOutcome::Forbidden => "forbidden",
            DeleteOutcome::Unknown(_) => "unknown",
        }
    }
}

/// A repository hosting provider reachable with one access token
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Short provider name for messages ("github")
    fn provider(&self) -> &str;

    /// The account the token belongs to
    async fn fetch_owner_identity(&self) -> Result<OwnerIdentity>;

    /// All repositories of the authenticated user
    async fn list_repositories(&self) -> Result<RepoListing>;

    /// Submit a creation request
    async fn submit_repository(&self, request: &CreateRepoRequest) -> Result<Submission>;

    /// Submit a deletion request and report the HTTP status
    async fn remove_repository(&self, owner: &str, name: &str) -> Result<StatusCode>;

    /// Git remote URL for a repository of `owner`
    fn remote_url(&self, owner: &OwnerIdentity, name: &str) -> String {
        format!("{}/{}", owner.html_url.trim_end_matches('/'), name)
    }

    /// Create `name` unless the listing already contains it
    async fn create_repository(&self, name: &str, private: bool) -> Result<CreateOutcome> {
        let repos = match self.list_repositories().await? {
            RepoListing::Available(repos) => repos,
            RepoListing::Unavailable(failure) => {
                tracing::warn!(
                    provider = self.provider(),
                    %failure,
                    "Repository list not accessible"
                );
                return Ok(CreateOutcome::ListUnavailable(failure));
            }
        };

        if repos.iter().any(|repo| repo.name == name) {
            tracing::info!(repo = %name, "Repository name already taken");
            return Ok(CreateOutcome::NameExists);
        }

        let request = CreateRepoRequest {
            name: name.to_string(),
            private,
        };
        match self.submit_repository(&request).await? {
            Submission::Created => {
                tracing::info!(repo = %name, private, "Repository created");
                Ok(CreateOutcome::Created)
            }
            Submission::Rejected(failure) => {
                tracing::warn!(repo = %name, %failure, "Repository creation rejected");
                Ok(CreateOutcome::CreationFailed(failure))
            }
        }
    }

    /// Delete `owner/name`; no retry
    async fn delete_repository(&self, owner: &str, name: &str) -> Result<DeleteOutcome> {
        let status = self.remove_repository(owner, name).await?;
        let outcome = DeleteOutcome::from_status(status);
        tracing::info!(
            %owner,
            repo = %name,
            %status,
            outcome = outcome.message(),
            "Delete request finished"
        );
        Ok(outcome)
    }
}

/// Builds a [`RepoHost`] once the access token is known
pub trait HostConnector {
    fn connect(&self, token: &str) -> Result<Box<dyn RepoHost>>;
}
