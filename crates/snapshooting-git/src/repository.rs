use git2::{
    BranchType, Cred, CredentialType, ErrorCode, PushOptions, RemoteCallbacks, Repository,
    Signature, Status, StatusOptions,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{FileState, FileStatus, GitError, VcsBackend, VcsRepository, WorkingTreeStatus};

/// Remote pushed to unless configured otherwise
pub const DEFAULT_REMOTE: &str = "origin";

const FALLBACK_AUTHOR: (&str, &str) = ("snapshooting", "snapshooting@localhost");

/// libgit2-backed [`VcsBackend`]
#[derive(Debug, Clone)]
pub struct Git2Backend {
    remote: String,
}

impl Default for Git2Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Git2Backend {
    pub fn new() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Open without boxing, for callers that want the concrete type
    pub fn open_repository(&self, path: &Path) -> Result<Git2Repository, GitError> {
        let repo = Repository::open(path).map_err(|source| GitError::NotARepo {
            path: path.to_path_buf(),
            source,
        })?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::Bare(path.to_path_buf()))?;

        Ok(Git2Repository {
            repo,
            workdir,
            remote: self.remote.clone(),
        })
    }
}

impl VcsBackend for Git2Backend {
    fn open(&self, path: &Path) -> Result<Box<dyn VcsRepository>, GitError> {
        Ok(Box::new(self.open_repository(path)?))
    }
}

/// An opened working copy
pub struct Git2Repository {
    repo: Repository,
    workdir: PathBuf,
    remote: String,
}

impl Git2Repository {
    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(GitError::GitOperationFailed(e)),
        }
    }

    fn signature(&self) -> Result<Signature<'static>, GitError> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) => {
                debug!(error = %e, "No git identity configured, using fallback author");
                Ok(Signature::now(FALLBACK_AUTHOR.0, FALLBACK_AUTHOR.1)?)
            }
        }
    }
}

impl VcsRepository for Git2Repository {
    fn status(&self) -> Result<WorkingTreeStatus, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        let mut status = WorkingTreeStatus::new();
        for entry in statuses.iter() {
            let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
            status.insert(path, file_status(entry.status()));
        }

        debug!(
            workdir = %self.workdir.display(),
            entries = status.len(),
            "Captured git status"
        );

        Ok(status)
    }

    fn current_branch_name(&self) -> Result<String, GitError> {
        // Read HEAD itself so an unborn branch still reports its name
        let head = self.repo.find_reference("HEAD")?;
        match head.symbolic_target() {
            Some(target) => Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string()),
            None => Ok("HEAD".to_string()),
        }
    }

    fn create_and_checkout_branch(&mut self, name: &str) -> Result<(), GitError> {
        if let Some(commit) = self.head_commit()? {
            self.repo.branch(name, &commit, false)?;
        }
        // The new branch points at the current commit, so moving HEAD keeps
        // both the index and the working tree as they are.
        self.repo.set_head(&format!("refs/heads/{}", name))?;
        debug!(branch = name, "Checked out new branch");
        Ok(())
    }

    fn stage_path(&mut self, path: &str) -> Result<(), GitError> {
        let mut index = self.repo.index()?;
        let relative = Path::new(path);

        if self.workdir.join(relative).symlink_metadata().is_ok() {
            index.add_path(relative)?;
        } else {
            index.remove_path(relative)?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<String, GitError> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!(commit = %oid, "Created commit");
        Ok(oid.to_string())
    }

    fn push(&mut self) -> Result<(), GitError> {
        let branch = self.current_branch_name()?;
        // Make sure the branch exists locally before building the refspec
        self.repo.find_branch(&branch, BranchType::Local)?;

        let refname = format!("refs/heads/{}", branch);
        let refspec = format!("{0}:{0}", refname);
        let config = self.repo.config()?;

        let rejected: RefCell<Option<(String, String)>> = RefCell::new(None);

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|url, username, allowed| {
            if allowed.contains(CredentialType::SSH_KEY) {
                if let Some(username) = username {
                    return Cred::ssh_key_from_agent(username);
                }
            }
            if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                return Cred::credential_helper(&config, url, username);
            }
            Cred::default()
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                *rejected.borrow_mut() = Some((refname.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let mut remote = self.repo.find_remote(&self.remote)?;
        if let Err(e) = remote.push(&[refspec.as_str()], Some(&mut options)) {
            warn!(remote = %self.remote, error = %e, "Push failed");
            return Err(GitError::GitOperationFailed(e));
        }

        if let Some((refname, message)) = rejected.borrow_mut().take() {
            return Err(GitError::PushRejected { refname, message });
        }

        debug!(remote = %self.remote, refname = %refname, "Pushed branch");
        Ok(())
    }
}

fn file_status(status: Status) -> FileStatus {
    if status.is_conflicted() {
        return FileStatus::new(FileState::Conflicted, FileState::Conflicted);
    }

    let staging = if status.is_index_new() {
        FileState::Added
    } else if status.is_index_modified() {
        FileState::Modified
    } else if status.is_index_deleted() {
        FileState::Deleted
    } else if status.is_index_renamed() {
        FileState::Renamed
    } else if status.is_index_typechange() {
        FileState::TypeChanged
    } else {
        FileState::Unmodified
    };

    let worktree = if status.is_wt_new() {
        FileState::Untracked
    } else if status.is_wt_modified() {
        FileState::Modified
    } else if status.is_wt_deleted() {
        FileState::Deleted
    } else if status.is_wt_renamed() {
        FileState::Renamed
    } else if status.is_wt_typechange() {
        FileState::TypeChanged
    } else {
        FileState::Unmodified
    };

    // Untracked paths have no index entry at all; report them as untracked on
    // both sides.
    if worktree == FileState::Untracked && staging == FileState::Unmodified {
        return FileStatus::untracked();
    }

    FileStatus::new(staging, worktree)
}
