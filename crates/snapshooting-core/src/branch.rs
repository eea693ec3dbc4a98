use snapshooting_git::{GitError, VcsRepository};
use tracing::debug;

/// Every snapshot branch name starts with this (case-sensitive)
pub const SNAPSHOT_BRANCH_PREFIX: &str = "__snapshot";

/// `__snapshot_<unix-seconds>`
pub fn snapshot_branch_name(timestamp: i64) -> String {
    format!("{}_{}", SNAPSHOT_BRANCH_PREFIX, timestamp)
}

pub fn is_snapshot_branch(name: &str) -> bool {
    name.starts_with(SNAPSHOT_BRANCH_PREFIX)
}

/// Branch checked out after [`ensure_snapshot_branch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsuredBranch {
    /// Already on a snapshot branch; nothing was created
    Existing(String),
    /// A new snapshot branch was created and checked out
    Created(String),
}

impl EnsuredBranch {
    pub fn name(&self) -> &str {
        match self {
            EnsuredBranch::Existing(name) | EnsuredBranch::Created(name) => name,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, EnsuredBranch::Created(_))
    }
}

/// Make sure the repository is on a snapshot branch before committing.
///
/// Working-tree changes survive the checkout.
pub fn ensure_snapshot_branch(
    repo: &mut dyn VcsRepository,
    timestamp: i64,
) -> Result<EnsuredBranch, GitError> {
    let current = repo.current_branch_name()?;
    if is_snapshot_branch(&current) {
        debug!(branch = %current, "Already on snapshot branch");
        return Ok(EnsuredBranch::Existing(current));
    }

    let name = snapshot_branch_name(timestamp);
    repo.create_and_checkout_branch(&name)?;
    debug!(from = %current, branch = %name, "Created snapshot branch");
    Ok(EnsuredBranch::Created(name))
}
