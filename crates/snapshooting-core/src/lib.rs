mod branch;
mod classifier;
mod commit;
mod descriptor;
mod error;
mod outcome;
mod scheduler;
mod snapshotter;
mod startup;

#[cfg(test)]
mod testing;

pub use branch::{
    ensure_snapshot_branch, is_snapshot_branch, snapshot_branch_name, EnsuredBranch,
    SNAPSHOT_BRANCH_PREFIX,
};
pub use classifier::{classify, ChangeSet, Classification};
pub use commit::{commit_and_push, commit_message, PushedCommit};
pub use descriptor::RepositoryDescriptor;
pub use error::StartupError;
pub use outcome::SnapshotOutcome;
pub use scheduler::{CycleSummary, Scheduler};
pub use snapshotter::{format_time, RepositorySnapshotter};
pub use startup::validate_repositories;
