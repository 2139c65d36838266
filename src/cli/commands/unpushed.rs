//! cli::commands::unpushed
//!
//! Report local commits that no remote contains, one id per line.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::unpushed::{unpushed_commits, CloneFailurePolicy};
use crate::git::Git;
use crate::ui::output;

/// Run the unpushed command.
///
/// `--abort-on-clone-failure` overrides the configured policy.
pub fn unpushed(ctx: &Context, abort_on_clone_failure: bool) -> Result<()> {
    let cwd = ctx.cwd()?;
    let git = Git::open(&cwd).context("not inside a git repository")?;

    let policy = if abort_on_clone_failure {
        CloneFailurePolicy::Abort
    } else {
        ctx.config.clone_failure_policy()
    };

    let commits = unpushed_commits(&git, policy).context("failed to find unpushed commits")?;
    for commit in commits {
        output::print(commit);
    }
    Ok(())
}
