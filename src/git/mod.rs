//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should
//! import `git2`. We use the `git2` crate exclusively (no shelling out to
//! the git CLI).
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Branch heads and reachable history
//! - Remote URL enumeration and normalization
//! - Ephemeral bare clones of remotes
//! - Remote tag listing without a clone
//! - Porcelain-style working tree status
//!
//! # Example
//!
//! ```ignore
//! use git_utils::git::{EphemeralClone, Git};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for url in git.remote_urls()? {
//!     let clone = EphemeralClone::clone_from(&url)?;
//!     println!("{}: {} commits", url, clone.git().reachable_commits()?.len());
//! }
//! ```

mod ephemeral;
mod interface;
pub mod urls;

pub use ephemeral::EphemeralClone;
pub use interface::{BranchHead, Git, GitError, StatusEntry};
