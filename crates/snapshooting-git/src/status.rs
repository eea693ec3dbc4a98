use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of a path in either the staging area or the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Unmodified,
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Untracked,
    Conflicted,
}

/// Staging-area and working-tree state of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub staging: FileState,
    pub worktree: FileState,
}

impl FileStatus {
    pub fn new(staging: FileState, worktree: FileState) -> Self {
        Self { staging, worktree }
    }

    pub fn untracked() -> Self {
        Self::new(FileState::Untracked, FileState::Untracked)
    }

    pub fn is_unmodified(&self) -> bool {
        self.staging == FileState::Unmodified && self.worktree == FileState::Unmodified
    }

    pub fn is_untracked(&self) -> bool {
        self.worktree == FileState::Untracked
    }
}

/// Snapshot of the working tree, keyed by path relative to the repository root.
///
/// Paths iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTreeStatus {
    entries: BTreeMap<String, FileStatus>,
}

impl WorkingTreeStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, status: FileStatus) {
        self.entries.insert(path.into(), status);
    }

    pub fn with(mut self, path: impl Into<String>, status: FileStatus) -> Self {
        self.insert(path, status);
        self
    }

    pub fn get(&self, path: &str) -> Option<&FileStatus> {
        self.entries.get(path)
    }

    pub fn is_untracked(&self, path: &str) -> bool {
        self.get(path).is_some_and(FileStatus::is_untracked)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileStatus)> {
        self.entries.iter().map(|(path, status)| (path.as_str(), status))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.entries.values().all(FileStatus::is_unmodified)
    }
}
