//! forge
//!
//! Access to the GitHub REST API.
//!
//! # Modules
//!
//! - [`github`]: the request client and the listing operations
//! - `pages`: page and element pagers following `Link` headers
//! - `links`: `Link` header parsing
//! - `error`: [`ForgeError`]
//!
//! # Pagination
//!
//! Paginated collections are read through [`Pages`] (whole responses) or
//! [`Items`] (the elements of array bodies). Both fetch lazily: a request is
//! only made when the caller asks for more than is buffered.

mod error;
pub mod github;
mod links;
mod pages;

pub use error::ForgeError;
pub use github::{
    AllCommits, CommitFilters, GitHubClient, RepoFilters, RepoOwner, RequestOptions,
    DEFAULT_API_BASE, DEFAULT_PER_PAGE,
};
pub use links::LinkSet;
pub use pages::{Items, Page, Pages};
