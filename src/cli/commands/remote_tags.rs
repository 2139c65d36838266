//! cli::commands::remote_tags
//!
//! `git ls-remote --tags` without the fluff: one tag name per line.
//!
//! # Example
//!
//! ```bash
//! # git://github.com/rust-lang/cargo
//! gu remote-tags rust-lang/cargo
//!
//! # Explicit scheme and host for a bare path
//! gu remote-tags -s https -H gitlab.com gitlab-org/gitlab
//!
//! # A local repository
//! gu remote-tags ../other-checkout
//! ```

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::Context;
use crate::git::urls::complete_repository_url;
use crate::git::Git;
use crate::ui::output;

/// List the tags of `repository`.
pub fn remote_tags(
    ctx: &Context,
    repository: &str,
    default_scheme: Option<&str>,
    default_host: Option<&str>,
) -> Result<()> {
    let scheme = default_scheme.unwrap_or(ctx.config.default_scheme());
    let host = default_host.unwrap_or(ctx.config.default_host());
    let url = complete_repository_url(repository, scheme, host);
    debug!(%repository, %url, "listing remote tags");

    let tags =
        Git::ls_remote_tags(&url).with_context(|| format!("failed to list tags of {}", url))?;
    for (_, tag) in tags {
        output::print(tag);
    }
    Ok(())
}
