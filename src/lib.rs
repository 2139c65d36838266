//! git-utils - command-line utilities for the GitHub REST API and for local
//! and remote git repositories
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the library)
//! - [`forge`] - Paginated GitHub REST client
//! - [`git`] - Single interface for all Git operations
//! - [`core`] - Domain types, commit deduplication, status summaries, config
//! - [`auth`] - Request credentials
//! - [`ui`] - Output formatting
//!
//! # Guarantees
//!
//! 1. Pagination fetches lazily and follows `next` links without recursion
//! 2. Remotes are cloned into temporary directories that are always removed
//! 3. The local repository is only ever read

pub mod auth;
pub mod cli;
pub mod core;
pub mod forge;
pub mod git;
pub mod ui;
