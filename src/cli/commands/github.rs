//! cli::commands::github
//!
//! GitHub API requests.
//!
//! # Example
//!
//! ```bash
//! # One resource
//! gu github path /repos/rust-lang/cargo
//!
//! # First and last pages of the root directory listing
//! gu github contents -o rust-lang -r cargo
//!
//! # Every repository of an organization, most recently pushed first
//! gu github repos --owner rust-lang --org --sort pushed
//! ```

use anyhow::{Context as _, Result};
use tracing::warn;

use crate::auth::{Credentials, DEFAULT_TOKEN_VAR, DEFAULT_USER_VAR};
use crate::cli::args::{GithubAuth, GithubCommand};
use crate::cli::Context;
use crate::forge::{GitHubClient, Items, Page, RepoFilters, RepoOwner};
use crate::ui::output;

/// Run a `gu github` subcommand.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn github(ctx: &Context, auth: &GithubAuth, command: GithubCommand) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(github_async(ctx, auth, command))
}

/// Credentials selected by the flags and environment.
///
/// `--basic` reads `GITHUB_USER` and `GITHUB_TOKEN`; otherwise `--token`
/// falls back to `GITHUB_TOKEN`.
pub fn credentials(auth: &GithubAuth) -> Credentials {
    let credentials = if auth.basic {
        Credentials::from_env(DEFAULT_USER_VAR, DEFAULT_TOKEN_VAR)
    } else {
        Credentials::from_token(
            auth.token
                .clone()
                .or_else(|| std::env::var(DEFAULT_TOKEN_VAR).ok()),
        )
    };

    if !credentials.is_authenticated() {
        warn!("no GitHub credentials found, requests are anonymous and heavily rate limited");
    }
    credentials
}

fn client(ctx: &Context, auth: &GithubAuth) -> GitHubClient {
    let api_base = auth
        .api_base
        .clone()
        .unwrap_or_else(|| ctx.config.api_base().to_string());
    GitHubClient::with_api_base(credentials(auth), api_base).with_per_page(ctx.config.per_page())
}

async fn github_async(ctx: &Context, auth: &GithubAuth, command: GithubCommand) -> Result<()> {
    let client = client(ctx, auth);

    match command {
        GithubCommand::Path { path } => {
            let page = client
                .get(&path)
                .await
                .with_context(|| format!("request for {} failed", path))?;
            output::print_json(page.body)?;
        }
        GithubCommand::Commits { repo } => {
            let pages = client
                .commits(&repo.owner, &repo.repo)
                .await
                .context("failed to list commits")?;
            print_first_and_last(pages)?;
        }
        GithubCommand::Watchers { repo } => {
            let pages = client
                .watchers(&repo.owner, &repo.repo)
                .await
                .context("failed to list watchers")?;
            print_first_and_last(pages)?;
        }
        GithubCommand::Contents { repo, path } => {
            let pages = client
                .contents(&repo.owner, &repo.repo, &path)
                .await
                .context("failed to list contents")?;
            print_first_and_last(pages)?;
        }
        GithubCommand::Repos {
            owner,
            org,
            repo_type,
            sort,
            direction,
            visibility,
            affiliation,
        } => {
            let owner = match owner {
                Some(name) if org => RepoOwner::Org(name),
                Some(name) => RepoOwner::User(name),
                None => RepoOwner::Authenticated,
            };
            let filters = RepoFilters {
                repo_type,
                sort,
                direction,
                visibility,
                affiliation,
            };
            print_items(client.list_repos(&owner, &filters))
                .await
                .context("failed to list repositories")?;
        }
        GithubCommand::Branches { repo, protected } => {
            let protected = protected.then_some(true);
            print_items(client.list_branches(&repo.owner, &repo.repo, protected))
                .await
                .context("failed to list branches")?;
        }
        GithubCommand::AllCommits { repo } => {
            let mut commits = client.all_commits(&repo.owner, &repo.repo);
            while let Some(commit) = commits
                .next_commit()
                .await
                .context("failed to list commits")?
            {
                output::print(commit);
            }
        }
    }

    Ok(())
}

fn print_first_and_last((first, last): (Page, Option<Page>)) -> Result<()> {
    output::print_json(first.body)?;
    if let Some(last) = last {
        output::print_json(last.body)?;
    }
    Ok(())
}

async fn print_items(mut items: Items<'_>) -> Result<()> {
    while let Some(item) = items.next_item().await? {
        output::print_json(item)?;
    }
    Ok(())
}
