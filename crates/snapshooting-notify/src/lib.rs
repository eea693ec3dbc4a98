//! # snapshooting-notify
//!
//! Notification sinks for snapshot outcomes.
//!
//! ## Key Types
//!
//! - [`Notifier`] - async sink accepting a severity, a title and a body
//! - [`SlackNotifier`] - posts to a Slack incoming webhook
//! - [`LogNotifier`] - writes notifications to the tracing log only
//! - [`Severity`] - `good`, `warning`, `danger`

mod log;
mod slack;

pub use log::LogNotifier;
pub use slack::{SlackNotifier, DEFAULT_TIMEOUT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack rejected notification ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Severity of a notification, rendered as the attachment color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivers snapshot notifications.
///
/// Implementations must bound their own latency; callers await `notify`
/// inline between repository attempts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, severity: Severity, title: &str, body: &str)
        -> Result<(), NotifyError>;
}
