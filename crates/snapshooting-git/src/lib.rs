//! # snapshooting-git
//!
//! Version-control backend for the snapshooting daemon.
//!
//! The snapshot pipeline never talks to libgit2 directly. It goes through the
//! [`VcsBackend`] / [`VcsRepository`] traits, which expose exactly the
//! operations a snapshot needs:
//!
//! - read the working-tree status ([`WorkingTreeStatus`])
//! - read the current branch name
//! - create and check out a branch without touching the working tree
//! - stage single paths, commit, and push
//!
//! ## Key Types
//!
//! - [`Git2Backend`] - libgit2 implementation of [`VcsBackend`]
//! - [`WorkingTreeStatus`] - path to [`FileStatus`] map, ordered by path
//! - [`GitError`] - errors raised by any backend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snapshooting_git::{Git2Backend, VcsBackend};
//! use std::path::Path;
//!
//! let backend = Git2Backend::new();
//! let repo = backend.open(Path::new("/home/me/notes"))?;
//!
//! for (path, status) in repo.status()?.iter() {
//!     println!("{path}: {:?}/{:?}", status.staging, status.worktree);
//! }
//! ```

mod backend;
mod error;
mod repository;
mod status;

pub use backend::{VcsBackend, VcsRepository};
pub use error::GitError;
pub use repository::{Git2Backend, Git2Repository, DEFAULT_REMOTE};
pub use status::{FileState, FileStatus, WorkingTreeStatus};
