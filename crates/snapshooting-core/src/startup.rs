use tracing::{debug, info};

use snapshooting_git::VcsBackend;
use snapshooting_github::VisibilityProvider;

use crate::error::StartupError;
use crate::RepositoryDescriptor;

/// Check every configured repository once before any snapshot is taken.
///
/// Each repository must be an existing working copy whose directory name
/// matches the remote name, and the remote must be private.
pub async fn validate_repositories(
    repositories: &[RepositoryDescriptor],
    backend: &dyn VcsBackend,
    visibility: &dyn VisibilityProvider,
) -> Result<(), StartupError> {
    if repositories.is_empty() {
        return Err(StartupError::NoRepositories);
    }

    for repo in repositories {
        backend
            .open(&repo.local_path)
            .map_err(|source| StartupError::NotARepository {
                path: repo.local_path.clone(),
                source,
            })?;

        let local = repo.base_name();
        if local != repo.name {
            return Err(StartupError::NameMismatch {
                local,
                remote: repo.name.clone(),
            });
        }

        let private = visibility
            .is_private(&repo.owner, &repo.name)
            .await
            .map_err(|source| StartupError::Visibility {
                owner: repo.owner.clone(),
                repo: repo.name.clone(),
                source,
            })?;
        if !private {
            return Err(StartupError::PublicRepository {
                owner: repo.owner.clone(),
                repo: repo.name.clone(),
            });
        }

        debug!(path = %repo.local_path.display(), "Repository validated");
    }

    info!(repositories = repositories.len(), "All repositories validated");
    Ok(())
}
