use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {path}: {source}")]
    NotARepo {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Git operation failed: {0}")]
    GitOperationFailed(#[from] git2::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Repository has no working directory: {0}")]
    Bare(PathBuf),

    #[error("Push of {refname} rejected by remote: {message}")]
    PushRejected { refname: String, message: String },

    /// Raised by non-git2 backends (and test doubles)
    #[error("{0}")]
    Backend(String),
}
