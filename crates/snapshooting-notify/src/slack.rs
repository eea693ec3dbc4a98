use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::{Notifier, NotifyError, Severity};

/// Upper bound on a single webhook request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts notifications to a Slack incoming webhook as colored attachments
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    http_client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        Self::with_timeout(webhook_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        webhook_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Build the `payload` form field sent to the webhook
    pub fn payload(severity: Severity, title: &str, body: &str) -> Result<String, NotifyError> {
        let payload = json!({
            "blocks": [],
            "attachments": [
                {
                    "mrkdwn_in": ["text"],
                    "color": severity.as_str(),
                    "text": format!("*{}* \n {}", title, body),
                }
            ]
        });
        Ok(serde_json::to_string(&payload)?)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(
        &self,
        severity: Severity,
        title: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let payload = Self::payload(severity, title, body)?;

        let response = self
            .http_client
            .post(&self.webhook_url)
            .form(&[("payload", payload)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(%severity, title, "Slack notification delivered");
        Ok(())
    }
}
