use snapshooting_git::WorkingTreeStatus;

/// Tracked paths with pending changes, in path order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    /// `None` for an empty list
    pub fn new(paths: Vec<String>) -> Option<Self> {
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths })
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false: `new` refuses an empty path list.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// What a snapshot attempt should do with the current working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Stage and commit these paths
    Changes(ChangeSet),
    /// Nothing tracked has changed
    NoChange,
    /// At least one untracked file exists; nothing may be committed.
    /// Carries every untracked path in path order.
    UntrackedFilesPresent(Vec<String>),
}

/// Classify a working-tree status.
///
/// Paths unmodified on both sides are skipped. A single untracked path blocks
/// the whole snapshot.
pub fn classify(status: &WorkingTreeStatus) -> Classification {
    let mut changed = Vec::new();
    let mut untracked = Vec::new();

    for (path, file) in status.iter() {
        if file.is_unmodified() {
            continue;
        }
        if file.is_untracked() {
            untracked.push(path.to_string());
        } else {
            changed.push(path.to_string());
        }
    }

    if !untracked.is_empty() {
        return Classification::UntrackedFilesPresent(untracked);
    }

    match ChangeSet::new(changed) {
        Some(changes) => Classification::Changes(changes),
        None => Classification::NoChange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapshooting_git::{FileState, FileStatus};

    fn modified() -> FileStatus {
        FileStatus::new(FileState::Modified, FileState::Modified)
    }

    fn unmodified() -> FileStatus {
        FileStatus::new(FileState::Unmodified, FileState::Unmodified)
    }

    #[test]
    fn test_empty_status_is_no_change() {
        assert_eq!(classify(&WorkingTreeStatus::new()), Classification::NoChange);
    }

    #[test]
    fn test_all_unmodified_is_no_change() {
        let status = WorkingTreeStatus::new()
            .with("a.txt", unmodified())
            .with("b.txt", unmodified());
        assert_eq!(classify(&status), Classification::NoChange);
    }

    #[test]
    fn test_modified_paths_in_order() {
        let status = WorkingTreeStatus::new()
            .with("z.txt", FileStatus::new(FileState::Unmodified, FileState::Deleted))
            .with("a.txt", modified())
            .with("skip.txt", unmodified())
            .with("m.txt", FileStatus::new(FileState::Added, FileState::Unmodified));

        match classify(&status) {
            Classification::Changes(changes) => {
                assert_eq!(changes.paths().to_vec(), vec!["a.txt", "m.txt", "z.txt"]);
            }
            other => panic!("expected changes, got {:?}", other),
        }
    }

    #[test]
    fn test_untracked_blocks_everything() {
        let status = WorkingTreeStatus::new()
            .with("a.txt", modified())
            .with("b.txt", FileStatus::untracked());
        assert_eq!(
            classify(&status),
            Classification::UntrackedFilesPresent(vec!["b.txt".to_string()])
        );
    }

    #[test]
    fn test_all_untracked_paths_reported_sorted() {
        let status = WorkingTreeStatus::new()
            .with("notes/z.md", FileStatus::untracked())
            .with("a.txt", modified())
            .with("notes/a.md", FileStatus::untracked());
        assert_eq!(
            classify(&status),
            Classification::UntrackedFilesPresent(vec![
                "notes/a.md".to_string(),
                "notes/z.md".to_string()
            ])
        );
    }

    #[test]
    fn test_change_set_rejects_empty() {
        assert!(ChangeSet::new(Vec::new()).is_none());
        let changes = ChangeSet::new(vec!["a.txt".to_string()]).unwrap();
        assert_eq!(changes.len(), 1);
        assert!(!changes.is_empty());
    }
}
