use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One monitored working copy and the remote repository it backs up to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub local_path: PathBuf,
    pub owner: String,
    pub name: String,
}

impl RepositoryDescriptor {
    pub fn new(
        local_path: impl Into<PathBuf>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Directory name of the working copy, used to tag logs and notifications
    pub fn base_name(&self) -> String {
        self.local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        let repo = RepositoryDescriptor::new("/home/me/src/notes", "me", "notes");
        assert_eq!(repo.base_name(), "notes");
    }

    #[test]
    fn test_base_name_trailing_slash() {
        let repo = RepositoryDescriptor::new("/home/me/src/notes/", "me", "notes");
        assert_eq!(repo.base_name(), "notes");
    }
}
