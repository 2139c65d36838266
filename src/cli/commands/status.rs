//! cli::commands::status
//!
//! Working tree summaries for several repositories at once.
//!
//! Repositories that are clean and in sync with `origin` are only listed
//! with `--verbose`.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::summary::{find_repositories, sorted_subdirectories, RepoSummary};
use crate::ui::output;

/// Print a summary per directory.
///
/// With no `dirs`, the child directories of the working directory are used.
/// With `maxdepth`, each directory is searched for repositories instead.
pub fn status(ctx: &Context, dirs: &[PathBuf], maxdepth: Option<usize>) -> Result<()> {
    let cwd = ctx.cwd()?;
    let roots = if dirs.is_empty() {
        match maxdepth {
            Some(_) => vec![cwd.clone()],
            None => sorted_subdirectories(&cwd)
                .with_context(|| format!("failed to list {}", cwd.display()))?,
        }
    } else {
        dirs.iter().map(|dir| cwd.join(dir)).collect()
    };

    let targets = match maxdepth {
        Some(depth) => {
            let mut found = Vec::new();
            for root in &roots {
                found.extend(
                    find_repositories(root, depth)
                        .with_context(|| format!("failed to search {}", root.display()))?,
                );
            }
            found
        }
        None => roots,
    };

    for target in targets {
        let summary = RepoSummary::from_path(&target);
        if summary.is_clean_and_committed() {
            if ctx.verbose > 0 {
                output::print(format!("({} is clean and committed)", target.display()));
            }
            continue;
        }
        for line in summary.lines() {
            output::print(line);
        }
    }
    Ok(())
}
