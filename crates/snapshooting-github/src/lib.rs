//! # snapshooting-github
//!
//! Remote repository metadata used once at startup to refuse snapshotting
//! into a public repository.
//!
//! - [`VisibilityProvider`] - "is this remote repository private?"
//! - [`GithubClient`] - GitHub REST API implementation

mod client;

pub use client::{GithubClient, DEFAULT_API_URL};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error for {owner}/{repo} ({status}): {message}")]
    Api {
        owner: String,
        repo: String,
        status: u16,
        message: String,
    },

    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

/// Answers whether a remote repository is private
#[async_trait]
pub trait VisibilityProvider: Send + Sync {
    async fn is_private(&self, owner: &str, repo: &str) -> Result<bool, GithubError>;
}
