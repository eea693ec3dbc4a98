use snapshooting_git::GitError;
use snapshooting_notify::Severity;

/// Result of one snapshot attempt for one repository
#[derive(Debug)]
pub enum SnapshotOutcome {
    /// No tracked file changed
    NoChange,
    /// Untracked files block the snapshot; nothing was committed
    UntrackedFilesPresent(Vec<String>),
    /// Changes were committed on a snapshot branch and pushed
    Success {
        branch: String,
        branch_created: bool,
        commit_id: String,
        commit_message: String,
    },
    /// Any backend failure after (or while) reading the status
    UnexpectedFailure(GitError),
}

impl SnapshotOutcome {
    /// Severity of the notification this outcome triggers, if any
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::NoChange => None,
            Self::UntrackedFilesPresent(_) => Some(Severity::Warning),
            Self::Success { .. } => Some(Severity::Good),
            Self::UnexpectedFailure(_) => Some(Severity::Danger),
        }
    }
}
