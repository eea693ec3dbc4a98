use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{error, info, warn};

use snapshooting_git::{GitError, VcsBackend};
use snapshooting_logging::{LogEvent, Logger};
use snapshooting_notify::{Notifier, NotifyError};

use crate::branch::ensure_snapshot_branch;
use crate::classifier::{classify, Classification};
use crate::commit::commit_and_push;
use crate::outcome::SnapshotOutcome;
use crate::RepositoryDescriptor;

/// Runs one snapshot attempt per call and reports its outcome
pub struct RepositorySnapshotter {
    backend: Arc<dyn VcsBackend>,
    notifier: Arc<dyn Notifier>,
    logger: Arc<Logger>,
}

impl RepositorySnapshotter {
    pub fn new(
        backend: Arc<dyn VcsBackend>,
        notifier: Arc<dyn Notifier>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            backend,
            notifier,
            logger,
        }
    }

    /// Attempt a snapshot and resolve it to exactly one outcome. No
    /// notification is sent.
    pub fn attempt(&self, repo: &RepositoryDescriptor, now: DateTime<Local>) -> SnapshotOutcome {
        match self.try_attempt(repo, now) {
            Ok(outcome) => outcome,
            Err(e) => SnapshotOutcome::UnexpectedFailure(e),
        }
    }

    fn try_attempt(
        &self,
        repo: &RepositoryDescriptor,
        now: DateTime<Local>,
    ) -> Result<SnapshotOutcome, GitError> {
        let timestamp = now.timestamp();
        let mut working_copy = self.backend.open(&repo.local_path)?;

        let changes = match classify(&working_copy.status()?) {
            Classification::NoChange => return Ok(SnapshotOutcome::NoChange),
            Classification::UntrackedFilesPresent(paths) => {
                return Ok(SnapshotOutcome::UntrackedFilesPresent(paths))
            }
            Classification::Changes(changes) => changes,
        };

        let branch = ensure_snapshot_branch(working_copy.as_mut(), timestamp)?;
        if branch.was_created() {
            self.logger.log(&LogEvent::BranchCreated {
                repo: repo.base_name(),
                branch: branch.name().to_string(),
            });
        }

        let pushed = commit_and_push(working_copy.as_mut(), &changes, timestamp)?;

        Ok(SnapshotOutcome::Success {
            branch: branch.name().to_string(),
            branch_created: branch.was_created(),
            commit_id: pushed.commit_id,
            commit_message: pushed.message,
        })
    }

    /// Attempt a snapshot, log the outcome and send its notification.
    ///
    /// An unexpected failure comes back as `Ok(UnexpectedFailure)` after it
    /// was logged and notified. `Err` means the notification itself could not
    /// be delivered; the outcome was already logged by then.
    pub async fn snapshot(
        &self,
        repo: &RepositoryDescriptor,
        now: DateTime<Local>,
    ) -> Result<SnapshotOutcome, NotifyError> {
        let name = repo.base_name();
        let outcome = self.attempt(repo, now);

        let message = match &outcome {
            SnapshotOutcome::NoChange => {
                info!(repo = %name, "No changes");
                self.logger.log(&LogEvent::NoChange { repo: name.clone() });
                None
            }
            SnapshotOutcome::UntrackedFilesPresent(paths) => {
                warn!(repo = %name, ?paths, "Untracked files present, snapshot skipped");
                self.logger.log(&LogEvent::UntrackedFilesPresent {
                    repo: name.clone(),
                    paths: paths.clone(),
                });
                Some((
                    format!("[{}] Snapshot not executed at {}", name, format_time(now)),
                    untracked_message(paths),
                ))
            }
            SnapshotOutcome::Success {
                branch,
                commit_message,
                ..
            } => {
                info!(repo = %name, %branch, "Pushed successfully");
                self.logger.log(&LogEvent::Pushed {
                    repo: name.clone(),
                    branch: branch.clone(),
                    commit_message: commit_message.clone(),
                });
                Some((
                    format!("[{}] Snapshot executed at {}", name, format_time(now)),
                    "looks good :)".to_string(),
                ))
            }
            SnapshotOutcome::UnexpectedFailure(e) => {
                let detail = e.to_string();
                error!(repo = %name, error = %detail, "Unexpected snapshot failure");
                self.logger.log(&LogEvent::SnapshotFailed {
                    repo: name.clone(),
                    error: detail.clone(),
                });
                Some((
                    format!("[{}] Unexpected error at {}", name, format_time(now)),
                    detail,
                ))
            }
        };

        if let (Some(severity), Some((title, body))) = (outcome.severity(), message) {
            self.notifier.notify(severity, &title, &body).await?;
        }
        Ok(outcome)
    }
}

/// `2024/01/31 09:15:00 (1706692500)`
pub fn format_time(now: DateTime<Local>) -> String {
    format!("{} ({})", now.format("%Y/%m/%d %H:%M:%S"), now.timestamp())
}

fn untracked_message(paths: &[String]) -> String {
    match paths {
        [single] => format!("{} is untracked", single),
        _ => format!("{} are untracked", paths.join(", ")),
    }
}
