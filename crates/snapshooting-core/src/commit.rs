use snapshooting_git::{GitError, VcsRepository};
use tracing::debug;

use crate::ChangeSet;

/// Commit message for a snapshot: the decimal Unix timestamp, nothing else
pub fn commit_message(timestamp: i64) -> String {
    timestamp.to_string()
}

/// Result of a successful [`commit_and_push`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedCommit {
    pub commit_id: String,
    pub message: String,
}

/// Stage every path of `changes`, commit, and push.
///
/// Stops at the first failure; nothing is retried.
pub fn commit_and_push(
    repo: &mut dyn VcsRepository,
    changes: &ChangeSet,
    timestamp: i64,
) -> Result<PushedCommit, GitError> {
    for path in changes.paths() {
        repo.stage_path(path)?;
    }

    let message = commit_message(timestamp);
    let commit_id = repo.commit(&message)?;
    debug!(commit = %commit_id, files = changes.len(), "Committed snapshot");

    repo.push()?;

    Ok(PushedCommit { commit_id, message })
}
