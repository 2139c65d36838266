//! git::ephemeral
//!
//! Throwaway clones of remote repositories.
//!
//! An [`EphemeralClone`] is a bare clone living in a private temporary
//! directory. The clone exists only to enumerate the commits a remote
//! holds; dropping it closes the repository and then deletes the directory,
//! on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use git_utils::git::EphemeralClone;
//!
//! let clone = EphemeralClone::clone_from("https://github.com/owner/repo.git")?;
//! let commits = clone.git().reachable_commits()?;
//! // directory removed here
//! ```

use tempfile::TempDir;
use tracing::debug;

use super::interface::{Git, GitError};

/// Refspec that maps every remote branch onto a local branch of the clone,
/// so branch enumeration in the clone sees all of the remote's heads.
const MIRROR_HEADS_REFSPEC: &str = "+refs/heads/*:refs/heads/*";

/// A bare clone in a temporary directory, removed on drop.
pub struct EphemeralClone {
    // Field order matters: the repository handle must be dropped before
    // the directory it lives in.
    git: Git,
    dir: TempDir,
}

impl std::fmt::Debug for EphemeralClone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralClone")
            .field("path", &self.dir.path())
            .finish()
    }
}

impl EphemeralClone {
    /// Clone `url` into a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Clone`] for any failure: temporary directory
    /// creation, network, authentication, or a malformed URL. A failed clone
    /// leaves nothing behind on disk.
    pub fn clone_from(url: &str) -> Result<Self, GitError> {
        let clone_err = |message: String| GitError::Clone {
            url: url.to_string(),
            message,
        };

        let dir = tempfile::Builder::new()
            .prefix("repo-")
            .suffix(".git")
            .tempdir()
            .map_err(|e| clone_err(e.to_string()))?;

        debug!(%url, path = %dir.path().display(), "cloning remote");

        let repo = git2::build::RepoBuilder::new()
            .bare(true)
            .remote_create(|repo, name, url| {
                repo.remote_with_fetch(name, url, MIRROR_HEADS_REFSPEC)
            })
            .clone(url, dir.path())
            .map_err(|e| clone_err(e.message().to_string()))?;

        Ok(Self {
            git: Git::from_repository(repo),
            dir,
        })
    }

    /// The cloned repository.
    pub fn git(&self) -> &Git {
        &self.git
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_directory_is_removed_on_drop() {
        let upstream = TempDir::new().unwrap();
        git2::Repository::init_bare(upstream.path()).unwrap();

        let clone = EphemeralClone::clone_from(&upstream.path().to_string_lossy()).unwrap();
        let path = clone.dir.path().to_path_buf();
        assert!(path.exists());
        assert!(clone.git().reachable_commits().unwrap().is_empty());

        drop(clone);
        assert!(!path.exists());
    }

    #[cfg(feature = "network")]
    #[test]
    fn remote_transports_are_available() {
        let version = git2::Version::get();
        assert!(version.https(), "libgit2 built without https");
        assert!(version.ssh(), "libgit2 built without ssh");
    }
}
