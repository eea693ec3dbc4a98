use std::path::PathBuf;
use thiserror::Error;

use snapshooting_git::GitError;
use snapshooting_github::GithubError;

/// Misconfiguration detected before scheduling starts; always fatal
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("No repositories configured")]
    NoRepositories,

    #[error("Interval must be greater than zero")]
    InvalidInterval,

    #[error("{path} is not a git working copy: {source}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: GitError,
    },

    #[error("`{local}` (local repo name) is different from `{remote}` (github repo name). Is it a mistake?")]
    NameMismatch { local: String, remote: String },

    #[error("Could not look up {owner}/{repo}: {source}")]
    Visibility {
        owner: String,
        repo: String,
        #[source]
        source: GithubError,
    },

    #[error("{owner}/{repo} is public!")]
    PublicRepository { owner: String, repo: String },
}
