//! Ignore-file template service
//!
//! `GET {base}/{topic,topic,...}` returns a ready-made `.gitignore` body.

use crate::Result;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

/// Result of a template request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateFetch {
    /// 200 with the template body
    Fetched(String),
    /// Any other status
    Rejected(StatusCode),
}

/// Source of `.gitignore` templates
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// URL that would be requested for `topics`
    fn url_for(&self, topics: &[String]) -> String;

    async fn fetch(&self, topics: &[String]) -> Result<TemplateFetch>;
}

/// Join URL-encoded topics with commas under `base`
pub fn template_url(base: &str, topics: &[String]) -> String {
    let joined = topics
        .iter()
        .map(|t| urlencoding::encode(t).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{}", base.trim_end_matches('/'), joined)
}

/// gitignore.io-compatible template service
pub struct GitignoreService {
    client: Client,
    base_url: String,
}

impl GitignoreService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(concat!(
                        "repoinit/",
                        env!("CARGO_PKG_VERSION")
                    )),
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl TemplateSource for GitignoreService {
    fn url_for(&self, topics: &[String]) -> String {
        template_url(&self.base_url, topics)
    }

    async fn fetch(&self, topics: &[String]) -> Result<TemplateFetch> {
        let url = self.url_for(topics);
        tracing::debug!(url = %url, "Fetching gitignore template");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::OK {
            Ok(TemplateFetch::Fetched(response.text().await?))
        } else {
            tracing::warn!(%status, url = %url, "Template service rejected request");
            Ok(TemplateFetch::Rejected(status))
        }
    }
}
