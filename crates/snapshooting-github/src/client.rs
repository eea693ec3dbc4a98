use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{GithubError, VisibilityProvider};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subset of `GET /repos/{owner}/{repo}` we care about
#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    private: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Minimal GitHub REST client
#[derive(Debug, Clone)]
pub struct GithubClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl GithubClient {
    /// Create a client; without a token requests are unauthenticated and
    /// private repositories are not visible.
    pub fn new(access_token: Option<&str>) -> Result<Self, GithubError> {
        Self::with_api_url(access_token, DEFAULT_API_URL)
    }

    pub fn with_api_url(
        access_token: Option<&str>,
        api_url: impl Into<String>,
    ) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("snapshooting"));
        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GithubError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn repository_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, owner, repo)
    }
}

#[async_trait]
impl VisibilityProvider for GithubClient {
    async fn is_private(&self, owner: &str, repo: &str) -> Result<bool, GithubError> {
        let url = self.repository_url(owner, repo);
        debug!(%url, "Fetching repository metadata");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = api_error_message(&text).unwrap_or(text);
            return Err(GithubError::Api {
                owner: owner.to_string(),
                repo: repo.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let metadata: RepositoryResponse = response.json().await?;
        Ok(metadata.private)
    }
}

fn api_error_message(text: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(text)
        .ok()
        .map(|e| e.message)
}
