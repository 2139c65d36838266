//! core::unpushed
//!
//! Find local commits that no remote has.
//!
//! # Algorithm
//!
//! 1. Collect every URL of every remote of the local repository (deduped).
//! 2. For each URL, lazily make an [`EphemeralClone`] and enumerate the
//!    commits reachable from its branch heads; the clone is deleted as soon
//!    as enumeration finishes.
//! 3. The per-remote commits are unioned through a [`LazySet`], so a remote
//!    is cloned only when a membership query reaches it, and at most once.
//! 4. Every commit reachable from a local branch head is tested against the
//!    union; those not found are reported.
//!
//! Remotes are fetched as full throwaway clones rather than incremental
//! fetches into the local repository, which therefore stays untouched.
//!
//! # Clone failures
//!
//! [`CloneFailurePolicy::Skip`] treats an uncloneable remote as holding no
//! commits, which can over-report unpushed commits when a clone fails
//! transiently. [`CloneFailurePolicy::Abort`] surfaces the first failure.

use std::vec::IntoIter;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::lazy_set::LazySet;
use super::types::CommitId;
use crate::git::urls::alias_url;
use crate::git::{EphemeralClone, Git, GitError};

/// What to do when a remote cannot be cloned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneFailurePolicy {
    /// The remote contributes no commits; the failure is logged.
    #[default]
    Skip,
    /// Stop and return the clone error.
    Abort,
}

impl std::str::FromStr for CloneFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "invalid clone failure policy '{}', must be one of: skip, abort",
                other
            )),
        }
    }
}

/// Errors from the unpushed-commit search.
#[derive(Debug, Error)]
pub enum UnpushedError {
    /// Reading the local repository failed.
    #[error(transparent)]
    Local(#[from] GitError),

    /// A remote could not be cloned (only under [`CloneFailurePolicy::Abort`]).
    #[error("remote {url} could not be cloned: {source}")]
    Clone {
        url: String,
        #[source]
        source: GitError,
    },
}

/// Lazy source of commits held by the remotes, one clone at a time.
///
/// Under [`CloneFailurePolicy::Abort`] the first failure is recorded and the
/// source ends; callers check [`RemoteCommits::failure`] after each query.
struct RemoteCommits {
    urls: IntoIter<String>,
    current: IntoIter<CommitId>,
    policy: CloneFailurePolicy,
    failure: Option<(String, GitError)>,
}

impl RemoteCommits {
    fn new(urls: Vec<String>, policy: CloneFailurePolicy) -> Self {
        Self {
            urls: urls.into_iter(),
            current: Vec::new().into_iter(),
            policy,
            failure: None,
        }
    }

    fn failure(&self) -> Option<&(String, GitError)> {
        self.failure.as_ref()
    }

    fn take_failure(&mut self) -> Option<(String, GitError)> {
        self.failure.take()
    }

    /// Clone `url` and list its commits; the clone is gone when this returns.
    fn enumerate(url: &str) -> Result<Vec<CommitId>, GitError> {
        let clone = EphemeralClone::clone_from(url)?;
        let commits = clone.git().reachable_commits()?;
        debug!(remote = %alias_url(url), count = commits.len(), "enumerated remote commits");
        Ok(commits)
    }
}

impl Iterator for RemoteCommits {
    type Item = CommitId;

    fn next(&mut self) -> Option<CommitId> {
        loop {
            if let Some(commit) = self.current.next() {
                return Some(commit);
            }
            if self.failure.is_some() {
                return None;
            }
            let url = self.urls.next()?;
            match Self::enumerate(&url) {
                Ok(commits) => self.current = commits.into_iter(),
                Err(err) => match self.policy {
                    CloneFailurePolicy::Skip => {
                        warn!(remote = %alias_url(&url), error = %err, "skipping remote that could not be cloned");
                    }
                    CloneFailurePolicy::Abort => {
                        self.failure = Some((url, err));
                        return None;
                    }
                },
            }
        }
    }
}

/// Commits reachable from local branches that no remote contains.
///
/// Results follow the local history walk order, each commit once.
///
/// # Errors
///
/// - [`UnpushedError::Local`] if the local repository cannot be read
/// - [`UnpushedError::Clone`] if a remote fails to clone under
///   [`CloneFailurePolicy::Abort`]
pub fn unpushed_commits(
    git: &Git,
    policy: CloneFailurePolicy,
) -> Result<Vec<CommitId>, UnpushedError> {
    let urls = git.remote_urls()?;
    debug!(remotes = urls.len(), ?policy, "searching for unpushed commits");

    let local = git.reachable_commits()?;
    let mut remote = LazySet::new(RemoteCommits::new(urls, policy));
    let mut missing = Vec::new();

    for commit in local {
        let found = remote.contains(&commit);
        if remote.source().failure().is_some() {
            break;
        }
        if !found {
            missing.push(commit);
        }
    }

    if let Some((url, source)) = remote.source_mut().take_failure() {
        return Err(UnpushedError::Clone { url, source });
    }

    Ok(missing)
}
