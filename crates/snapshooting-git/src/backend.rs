use std::path::Path;

use crate::{GitError, WorkingTreeStatus};

/// Opens working copies for the snapshot pipeline
pub trait VcsBackend: Send + Sync {
    /// Open the working copy at `path`; fails if it is not a repository
    fn open(&self, path: &Path) -> Result<Box<dyn VcsRepository>, GitError>;
}

/// Operations the snapshot pipeline performs on one opened working copy.
///
/// Every call may fail with a backend-specific error; callers treat all of
/// them as fatal to the current attempt.
pub trait VcsRepository: Send {
    /// Fresh working-tree status, untracked files included
    fn status(&self) -> Result<WorkingTreeStatus, GitError>;

    /// Short name of the checked-out branch (`HEAD` when detached)
    fn current_branch_name(&self) -> Result<String, GitError>;

    /// Create `name` at the current commit and check it out, leaving the
    /// index and working tree untouched
    fn create_and_checkout_branch(&mut self, name: &str) -> Result<(), GitError>;

    /// Stage a single path (a path missing from disk is staged as a removal)
    fn stage_path(&mut self, path: &str) -> Result<(), GitError>;

    /// Commit the index on top of HEAD, returning the new commit id
    fn commit(&mut self, message: &str) -> Result<String, GitError>;

    /// Push the current branch to the configured remote
    fn push(&mut self) -> Result<(), GitError>;
}
