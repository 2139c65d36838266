//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations.
//! Repository reads flow through [`Git`], which returns strong types
//! ([`CommitId`]) and normalizes git2 failures into [`GitError`].
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::Clone`]: A remote could not be cloned
//! - [`GitError::UnsupportedTagFormat`]: A remote advertised a tag ref we
//!   do not understand
//!
//! # Example
//!
//! ```ignore
//! use git_utils::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for url in git.remote_urls()? {
//!     println!("{}", url);
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{CommitId, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The id that was not found
        oid: String,
    },

    /// Invalid commit id format.
    #[error("invalid commit id: {oid}")]
    InvalidCommitId {
        /// The invalid id string
        oid: String,
    },

    /// Cloning a remote failed.
    #[error("failed to clone {url}: {message}")]
    Clone {
        /// The URL that could not be cloned
        url: String,
        /// Description of the failure
        message: String,
    },

    /// Talking to a remote failed (connect or ref listing).
    #[error("remote {url}: {message}")]
    Remote {
        /// The remote URL
        url: String,
        /// Description of the failure
        message: String,
    },

    /// A ref under `refs/tags/` has a form we do not recognize.
    #[error("unsupported tag format: {refname}")]
    UnsupportedTagFormat {
        /// The advertised ref name
        refname: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context.contains("ref") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidCommitId {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidCommitId(msg) => GitError::InvalidCommitId { oid: msg },
        }
    }
}

/// A local branch and the commit its head resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHead {
    /// Short branch name (e.g. `main`)
    pub name: String,
    /// Commit at the branch tip
    pub commit: CommitId,
}

/// One entry of `git status --porcelain=v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character status code (`" M"`, `"A "`, `"??"`, ...)
    pub xy: String,
    /// Path relative to the working directory
    pub path: String,
}

impl std::fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.xy, self.path)
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository. Bare repositories are accepted.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Open the repository rooted exactly at `path`, without searching parents.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository root
    pub fn open_exact(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Wrap an already-open repository.
    pub(crate) fn from_repository(repo: git2::Repository) -> Self {
        Self { repo }
    }

    // =========================================================================
    // Branches and History
    // =========================================================================

    /// List every local branch with the commit at its tip.
    ///
    /// Branches whose names are not UTF-8, or that do not point at a commit,
    /// are skipped.
    pub fn branch_heads(&self) -> Result<Vec<BranchHead>, GitError> {
        let branches = self
            .repo
            .branches(Some(git2::BranchType::Local))
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        let mut heads = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            let Some(name) = branch.name().ok().flatten().map(String::from) else {
                continue;
            };
            let Ok(commit) = branch.get().peel_to_commit() else {
                continue;
            };
            heads.push(BranchHead {
                name,
                commit: CommitId::new(commit.id().to_string())?,
            });
        }

        Ok(heads)
    }

    /// All commits reachable from any local branch head.
    ///
    /// Each commit appears once, in revwalk order (newest first per head).
    pub fn reachable_commits(&self) -> Result<Vec<CommitId>, GitError> {
        let heads = self.branch_heads()?;
        if heads.is_empty() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;
        for head in &heads {
            let oid = git2::Oid::from_str(head.commit.as_str())
                .map_err(|e| GitError::from_git2(e, head.commit.as_str()))?;
            revwalk.push(oid).map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            commits.push(CommitId::new(oid.to_string())?);
        }

        Ok(commits)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// All URLs of all configured remotes, deduplicated.
    ///
    /// A remote contributes its fetch URL and, when configured separately,
    /// its push URL. Order follows the remote configuration.
    pub fn remote_urls(&self) -> Result<Vec<String>, GitError> {
        let names = self.repo.remotes().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for name in names.iter().flatten() {
            let remote = self
                .repo
                .find_remote(name)
                .map_err(|e| GitError::from_git2(e, name))?;
            for url in [remote.url(), remote.pushurl()].into_iter().flatten() {
                if seen.insert(url.to_string()) {
                    urls.push(url.to_string());
                }
            }
        }

        Ok(urls)
    }

    /// Local branches whose tip matches no remote-tracking ref.
    ///
    /// A branch is reported when its head commit is not the target of any
    /// `refs/remotes/*` ref, whether it is ahead of its upstream or was
    /// never pushed at all.
    pub fn heads_off_remote(&self) -> Result<Vec<String>, GitError> {
        let references = self
            .repo
            .references_glob("refs/remotes/*")
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        let mut remote_tips = HashSet::new();
        for reference in references {
            let reference = reference.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            // `origin/HEAD` peels to a branch tip that is already listed.
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            remote_tips.insert(CommitId::new(commit.id().to_string())?);
        }

        Ok(self
            .branch_heads()?
            .into_iter()
            .filter(|head| !remote_tips.contains(&head.commit))
            .map(|head| head.name)
            .collect())
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Porcelain v1 status entries for the working tree.
    ///
    /// Untracked files are included (`??`), ignored files are not.
    ///
    /// # Errors
    ///
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn status_entries(&self) -> Result<Vec<StatusEntry>, GitError> {
        if self.repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        let mut entries = Vec::new();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                continue;
            };
            entries.push(StatusEntry {
                xy: porcelain_code(entry.status()),
                path: path.to_string(),
            });
        }

        Ok(entries)
    }

    /// `git stash list` lines, newest first.
    ///
    /// Each line is `stash@{N}: <message>`; no stashes gives an empty list.
    pub fn stashes(&self) -> Result<Vec<String>, GitError> {
        let reflog = self
            .repo
            .reflog("refs/stash")
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        Ok(reflog
            .iter()
            .enumerate()
            .map(|(index, entry)| format!("stash@{{{}}}: {}", index, entry.message().unwrap_or("")))
            .collect())
    }

    /// The `## ...` header line of `git status --porcelain=v1 --branch`.
    ///
    /// Forms produced:
    /// - `## main...origin/main [ahead 1, behind 2]`
    /// - `## main` (no upstream)
    /// - `## HEAD (no branch)` (detached)
    /// - `## No commits yet on main` (unborn)
    pub fn branch_tracking_line(&self) -> Result<String, GitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let target = self
                    .repo
                    .find_reference("HEAD")
                    .ok()
                    .and_then(|r| r.symbolic_target().map(String::from))
                    .unwrap_or_default();
                let name = target.strip_prefix("refs/heads/").unwrap_or(&target);
                return Ok(format!("## No commits yet on {}", name));
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok("## HEAD (no branch)".to_string());
        }

        let name = head.shorthand().unwrap_or("HEAD").to_string();
        let branch = git2::Branch::wrap(head);
        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(_) => return Ok(format!("## {}", name)),
        };
        let upstream_name = upstream.name().ok().flatten().unwrap_or("").to_string();

        let mut line = format!("## {}...{}", name, upstream_name);
        if let (Some(local), Some(remote)) = (branch.get().target(), upstream.get().target()) {
            let (ahead, behind) = self.repo.graph_ahead_behind(local, remote)?;
            let mut parts = Vec::new();
            if ahead > 0 {
                parts.push(format!("ahead {}", ahead));
            }
            if behind > 0 {
                parts.push(format!("behind {}", behind));
            }
            if !parts.is_empty() {
                line.push_str(&format!(" [{}]", parts.join(", ")));
            }
        }

        Ok(line)
    }

    // =========================================================================
    // Remote Tags
    // =========================================================================

    /// List tags advertised by a remote without cloning it.
    ///
    /// Equivalent to `git ls-remote --tags <url>`, with peeled `^{}` entries
    /// folded into their tag. Returns `(commit, tag name)` pairs in
    /// advertisement order; annotated tags report the peeled commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::Remote`] if the remote cannot be reached
    /// - [`GitError::UnsupportedTagFormat`] for unrecognized `refs/tags/` entries
    pub fn ls_remote_tags(url: &str) -> Result<Vec<(String, String)>, GitError> {
        let remote_err = |e: git2::Error| GitError::Remote {
            url: url.to_string(),
            message: e.message().to_string(),
        };

        let mut remote = git2::Remote::create_detached(url).map_err(remote_err)?;
        remote
            .connect(git2::Direction::Fetch)
            .map_err(remote_err)?;

        let advertised: Vec<(String, String)> = remote
            .list()
            .map_err(remote_err)?
            .iter()
            .map(|head| (head.name().to_string(), head.oid().to_string()))
            .collect();

        remote.disconnect().map_err(remote_err)?;

        parse_tag_refs(advertised)
    }
}

/// Fold advertised `(refname, oid)` pairs into `(oid, tag)` pairs.
///
/// Only refs under `refs/tags/` are considered. A `refs/tags/<name>^{}`
/// entry replaces the oid of `<name>` with the peeled commit.
pub(crate) fn parse_tag_refs(
    advertised: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<(String, String)>, GitError> {
    let mut tags: Vec<(String, String)> = Vec::new();

    for (refname, oid) in advertised {
        let Some(rest) = refname.strip_prefix("refs/tags/") else {
            continue;
        };

        let (name, peeled) = match rest.strip_suffix("^{}") {
            Some(name) => (name, true),
            None => (rest, false),
        };
        if name.is_empty() || name.contains("^{") || name.ends_with('/') {
            return Err(GitError::UnsupportedTagFormat { refname });
        }

        if peeled {
            match tags.iter_mut().find(|(_, tag)| tag == name) {
                Some(entry) => entry.0 = oid,
                None => tags.push((oid, name.to_string())),
            }
        } else if !tags.iter().any(|(_, tag)| tag == name) {
            tags.push((oid, name.to_string()));
        }
    }

    Ok(tags)
}

/// Map git2 status flags to a porcelain v1 `XY` code.
fn porcelain_code(status: git2::Status) -> String {
    if status.is_conflicted() {
        return "UU".to_string();
    }
    if status.is_wt_new() && !status.intersects(index_flags()) {
        return "??".to_string();
    }

    let x = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    let y = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    format!("{}{}", x, y)
}

fn index_flags() -> git2::Status {
    git2::Status::INDEX_NEW
        | git2::Status::INDEX_MODIFIED
        | git2::Status::INDEX_DELETED
        | git2::Status::INDEX_RENAMED
        | git2::Status::INDEX_TYPECHANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn error_display_formatting() {
            let err = GitError::Clone {
                url: "https://example.com/repo.git".to_string(),
                message: "unreachable".to_string(),
            };
            assert!(err.to_string().contains("failed to clone"));
            assert!(err.to_string().contains("example.com"));

            let err = GitError::UnsupportedTagFormat {
                refname: "refs/tags/".to_string(),
            };
            assert_eq!(err.to_string(), "unsupported tag format: refs/tags/");
        }

        #[test]
        fn type_error_converts() {
            let err: GitError = TypeError::InvalidCommitId("bad".into()).into();
            assert!(matches!(err, GitError::InvalidCommitId { .. }));
        }
    }

    mod porcelain {
        use super::*;

        #[test]
        fn untracked() {
            assert_eq!(porcelain_code(git2::Status::WT_NEW), "??");
        }

        #[test]
        fn worktree_modified() {
            assert_eq!(porcelain_code(git2::Status::WT_MODIFIED), " M");
        }

        #[test]
        fn staged_and_modified() {
            let status = git2::Status::INDEX_NEW | git2::Status::WT_MODIFIED;
            assert_eq!(porcelain_code(status), "AM");
        }

        #[test]
        fn staged_deletion() {
            assert_eq!(porcelain_code(git2::Status::INDEX_DELETED), "D ");
        }

        #[test]
        fn conflicted() {
            assert_eq!(porcelain_code(git2::Status::CONFLICTED), "UU");
        }
    }

    mod tag_refs {
        use super::*;

        fn refs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(r, o)| (r.to_string(), o.to_string()))
                .collect()
        }

        #[test]
        fn lightweight_tags() {
            let tags = parse_tag_refs(refs(&[
                ("HEAD", "aaa"),
                ("refs/heads/main", "aaa"),
                ("refs/tags/v1.0", "bbb"),
                ("refs/tags/v1.1", "ccc"),
            ]))
            .unwrap();
            assert_eq!(
                tags,
                vec![
                    ("bbb".to_string(), "v1.0".to_string()),
                    ("ccc".to_string(), "v1.1".to_string()),
                ]
            );
        }

        #[test]
        fn peeled_entry_replaces_tag_object() {
            let tags = parse_tag_refs(refs(&[
                ("refs/tags/v2.0", "tagobj"),
                ("refs/tags/v2.0^{}", "commit"),
            ]))
            .unwrap();
            assert_eq!(tags, vec![("commit".to_string(), "v2.0".to_string())]);
        }

        #[test]
        fn nested_tag_names_are_kept() {
            let tags = parse_tag_refs(refs(&[("refs/tags/release/2024", "ddd")])).unwrap();
            assert_eq!(tags[0].1, "release/2024");
        }

        #[test]
        fn empty_tag_name_is_rejected() {
            let err = parse_tag_refs(refs(&[("refs/tags/", "eee")])).unwrap_err();
            assert!(matches!(err, GitError::UnsupportedTagFormat { refname } if refname == "refs/tags/"));
        }

        #[test]
        fn unknown_peel_suffix_is_rejected() {
            let err = parse_tag_refs(refs(&[("refs/tags/v1^{tree}", "fff")])).unwrap_err();
            assert!(matches!(err, GitError::UnsupportedTagFormat { .. }));
        }
    }
}
