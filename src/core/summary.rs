//! core::summary
//!
//! Per-repository status summaries for `gu status`.
//!
//! A summary holds the `## branch...upstream` tracking line and the
//! porcelain v1 entries of a working tree, plus the stashes and the local
//! branches no remote has. A repository is "clean and committed" when its
//! branch tracks the same-named branch on `origin` with nothing ahead or
//! behind and nothing else is left locally: no entries, no stashes, and no
//! branch off every remote.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::git::{Git, GitError, StatusEntry};

/// Status of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSummary {
    /// Directory that was inspected
    pub path: PathBuf,
    /// `## ...` tracking line, `None` if `path` is not a repository
    pub tracking: Option<String>,
    /// Porcelain v1 entries
    pub entries: Vec<StatusEntry>,
    /// `git stash list` lines
    pub stashes: Vec<String>,
    /// Local branches whose tip is on no remote
    pub heads_off_remote: Vec<String>,
}

impl RepoSummary {
    /// Summarize the repository rooted at `path`.
    ///
    /// Directories that are not repositories (or cannot be read) produce a
    /// summary without a tracking line.
    pub fn from_path(path: &Path) -> Self {
        let read = || -> Result<Self, GitError> {
            let git = Git::open_exact(path)?;
            Ok(Self {
                path: path.to_path_buf(),
                tracking: Some(git.branch_tracking_line()?),
                entries: git.status_entries()?,
                stashes: git.stashes()?,
                heads_off_remote: git.heads_off_remote()?,
            })
        };

        read().unwrap_or_else(|err| {
            debug!(path = %path.display(), error = %err, "failed to read git repo");
            Self {
                path: path.to_path_buf(),
                ..Self::default()
            }
        })
    }

    /// Whether `path` was a readable repository.
    pub fn is_repository(&self) -> bool {
        self.tracking.is_some()
    }

    /// Whether the branch is in sync with its `origin` counterpart.
    pub fn is_committed(&self) -> bool {
        self.tracking.as_deref().is_some_and(tracks_origin)
    }

    /// Nothing exists only in this working tree.
    pub fn is_clean_and_committed(&self) -> bool {
        self.is_committed() && self.is_clean()
    }

    fn is_clean(&self) -> bool {
        self.entries.is_empty() && self.stashes.is_empty() && self.heads_off_remote.is_empty()
    }

    /// Report lines: the path, then the tracking line when it is not in
    /// sync, then one line per entry, stash, and branch off every remote.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.path.display().to_string()];
        match &self.tracking {
            None => lines.push("not a git repo".to_string()),
            Some(tracking) if !tracks_origin(tracking) => lines.push(tracking.clone()),
            Some(_) if self.is_clean() => lines.push("clean and committed".to_string()),
            Some(_) => {}
        }
        lines.extend(self.entries.iter().map(ToString::to_string));
        lines.extend(self.stashes.iter().cloned());
        lines.extend(
            self.heads_off_remote
                .iter()
                .map(|name| format!("branch {} is not on any remote", name)),
        );
        lines
    }
}

/// `## NAME...origin/NAME` with nothing after it.
fn tracks_origin(line: &str) -> bool {
    line.strip_prefix("## ")
        .and_then(|rest| rest.split_once("..."))
        .is_some_and(|(local, upstream)| {
            !local.is_empty() && upstream.strip_prefix("origin/") == Some(local)
        })
}

/// Repository roots under `path`, depth-first in case-insensitive name order.
///
/// Stops descending at a directory containing `.git` or at `maxdepth`
/// (`maxdepth = 1` inspects the children of `path` but no further).
pub fn find_repositories(path: &Path, maxdepth: usize) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(path, maxdepth, &mut found)?;
    Ok(found)
}

fn walk(path: &Path, maxdepth: usize, found: &mut Vec<PathBuf>) -> io::Result<()> {
    if path.join(".git").exists() {
        found.push(path.to_path_buf());
        return Ok(());
    }
    if maxdepth == 0 {
        return Ok(());
    }
    for child in sorted_subdirectories(path)? {
        walk(&child, maxdepth - 1, found)?;
    }
    Ok(())
}

/// Child directories of `path`, sorted case-insensitively.
pub fn sorted_subdirectories(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            children.push(entry.path());
        }
    }
    children.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    Ok(children)
}
