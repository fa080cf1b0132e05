//! GitHub REST adapter
//!
//! Implements [`RepoHost`] against `GET /user`, `GET /user/repos`,
//! `POST /user/repos` and `DELETE /repos/{owner}/{repo}`, authenticating
//! every call with a bearer token.

use super::host::{
    ApiFailure, CreateRepoRequest, HostConnector, OwnerIdentity, RepoHost, RepoListing,
    RepoSummary, Submission,
};
use crate::{RepoInitError, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, header::HeaderMap, Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Repositories requested per listing page (GitHub's maximum)
const PER_PAGE: usize = 100;

/// Stop paging after this many pages
const MAX_PAGES: usize = 50;

const USER_AGENT: &str = concat!("repoinit/", env!("CARGO_PKG_VERSION"));

/// GitHub API client bound to one access token
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(USER_AGENT),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github.v3+json"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Map a non-success response onto the error taxonomy
    async fn error_for(response: Response) -> RepoInitError {
        let status = response.status();
        let rate_exhausted = rate_limit_exhausted(response.headers());
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => RepoInitError::Unauthorized(message),
            StatusCode::TOO_MANY_REQUESTS => RepoInitError::RateLimited,
            StatusCode::FORBIDDEN if rate_exhausted => RepoInitError::RateLimited,
            _ => RepoInitError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// GitHub signals a spent quota with `x-ratelimit-remaining: 0`
fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// GitHub error bodies look like `{"message": "...", ...}`
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl RepoHost for GitHubClient {
    fn provider(&self) -> &str {
        "github"
    }

    async fn fetch_owner_identity(&self) -> Result<OwnerIdentity> {
        debug!(api_url = %self.api_url, "Fetching authenticated user");

        let response = self
            .client
            .get(self.url("/user"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Self::error_for(response).await);
        }

        let owner: OwnerIdentity = response
            .json()
            .await
            .context("Failed to parse GitHub user response")?;

        debug!(login = %owner.login, "Authenticated");
        Ok(owner)
    }

    async fn list_repositories(&self) -> Result<RepoListing> {
        let mut repos = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = self
                .client
                .get(self.url("/user/repos"))
                .bearer_auth(&self.token)
                .query(&[
                    ("affiliation", "owner".to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                let failure =
                    ApiFailure::from_response(status, rate_limit_exhausted(response.headers()));
                let body = response.text().await.unwrap_or_default();
                warn!(%status, %failure, page, body = %body, "Listing repositories failed");
                return Ok(RepoListing::Unavailable(failure));
            }

            let batch: Vec<RepoSummary> = response
                .json()
                .await
                .context("Failed to parse GitHub repository list")?;
            let last_page = batch.len() < PER_PAGE;
            repos.extend(batch);

            if last_page {
                break;
            }
            if page == MAX_PAGES {
                warn!(count = repos.len(), "Repository listing truncated at page limit");
            }
        }

        debug!(count = repos.len(), "Listed repositories");
        Ok(RepoListing::Available(repos))
    }

    async fn submit_repository(&self, request: &CreateRepoRequest) -> Result<Submission> {
        let response = self
            .client
            .post(self.url("/user/repos"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(Submission::Created);
        }

        let failure = ApiFailure::from_response(status, rate_limit_exhausted(response.headers()));
        let body = response.text().await.unwrap_or_default();
        debug!(
            %status,
            repo = %request.name,
            message = ?extract_message(&body),
            "Create request rejected"
        );
        Ok(Submission::Rejected(failure))
    }

    async fn remove_repository(&self, owner: &str, name: &str) -> Result<StatusCode> {
        let path = format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );

        let response = self
            .client
            .delete(self.url(&path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(response.status())
    }
}

/// Connects to GitHub (or GitHub Enterprise) once a token is available
#[derive(Debug, Clone)]
pub struct GitHubConnector {
    pub api_url: String,
    pub timeout: Duration,
}

impl GitHubConnector {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            timeout,
        }
    }
}

impl HostConnector for GitHubConnector {
    fn connect(&self, token: &str) -> Result<Box<dyn RepoHost>> {
        Ok(Box::new(GitHubClient::new(&self.api_url, token, self.timeout)?))
    }
}
