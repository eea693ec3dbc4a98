use async_trait::async_trait;
use tracing::{info, warn};

use crate::{Notifier, NotifyError, Severity};

/// Sink used when no webhook is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        severity: Severity,
        title: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        match severity {
            Severity::Good => info!(%severity, title, body, "Notification"),
            Severity::Warning | Severity::Danger => warn!(%severity, title, body, "Notification"),
        }
        Ok(())
    }
}
