//! core
//!
//! Domain types and the repository-level operations built on them.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommitId
//! - [`lazy_set`] - Deduplicating set over a single-use source
//! - [`unpushed`] - Commits no remote has
//! - [`summary`] - Working tree status summaries
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod lazy_set;
pub mod summary;
pub mod types;
pub mod unpushed;
