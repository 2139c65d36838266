//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Read configuration from this file
//! - `--verbose` / `-v`: Log more (repeat for more detail)

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// git-utils - GitHub API and git repository utilities
#[derive(Parser, Debug)]
#[command(name = "gu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gu was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log extra information (repeat for even more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute GitHub API requests
    #[command(
        name = "github",
        long_about = "Execute GitHub API requests.\n\n\
            Responses are printed as JSON with keys ending in 'url' removed. \
            Authenticates with --token or $GITHUB_TOKEN; with --basic, uses \
            $GITHUB_USER and $GITHUB_TOKEN for basic auth.",
        after_help = "\
EXAMPLES:
    # The authenticated user
    gu github path /user

    # First and last pages of a repository's commits
    gu github commits -o rust-lang -r cargo

    # Every distinct commit on every branch
    gu github all-commits -o rust-lang -r cargo"
    )]
    Github {
        #[command(flatten)]
        auth: GithubAuth,

        #[command(subcommand)]
        command: GithubCommand,
    },

    /// git ls-remote --tags without the fluff
    #[command(
        name = "remote-tags",
        long_about = "List the tags of a remote repository.\n\n\
            REPOSITORY can be a URL, the path part of a URL (in which case the \
            scheme and host are added from --default-scheme and --default-host), \
            or a filesystem path."
    )]
    RemoteTags {
        /// Repository URL, URL path (e.g. rust-lang/cargo), or filesystem path
        repository: String,

        /// Scheme added to a bare URL path [default: git]
        #[arg(short = 's', long)]
        default_scheme: Option<String>,

        /// Host added to a bare URL path [default: github.com]
        #[arg(short = 'H', long)]
        default_host: Option<String>,
    },

    /// Print statuses for multiple git repositories
    #[command(
        name = "status",
        long_about = "Print statuses for multiple git repositories.\n\n\
            DIRS defaults to the child directories of the current directory. \
            Stashes and branches that are on no remote are listed too. \
            Repositories that are clean and in sync with origin are only \
            reported with --verbose.",
        after_help = "\
EXAMPLES:
    # Every child directory of the current directory
    gu status

    # Search two levels deep for repositories
    gu status ~/src --maxdepth 2"
    )]
    Status {
        /// Directories to report on
        dirs: Vec<PathBuf>,

        /// Search DIRS for repositories down to this depth instead of
        /// reporting on them directly
        #[arg(short = 'd', long, value_name = "DEPTH")]
        maxdepth: Option<usize>,
    },

    /// List local commits that no remote contains
    #[command(
        name = "unpushed",
        long_about = "List local commits that no remote contains.\n\n\
            Every URL of every remote is cloned into a temporary directory, \
            lazily and at most once, and the commits reachable from the local \
            branches are checked against them. The local repository is not \
            modified. Remotes that cannot be cloned are skipped with a warning \
            unless --abort-on-clone-failure is given."
    )]
    Unpushed {
        /// Fail instead of skipping remotes that cannot be cloned
        #[arg(long)]
        abort_on_clone_failure: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    gu completion bash > ~/.local/share/bash-completion/completions/gu

    # Zsh
    gu completion zsh > ~/.zfunc/_gu

    # Fish
    gu completion fish > ~/.config/fish/completions/gu.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Authentication flags for `gu github`.
#[derive(Args, Debug, Clone, Default)]
pub struct GithubAuth {
    /// Authorization token [default: $GITHUB_TOKEN]
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Use basic auth with $GITHUB_USER and $GITHUB_TOKEN
    #[arg(long, global = true, conflicts_with = "token")]
    pub basic: bool,

    /// API base URL (GitHub Enterprise)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

/// Owner and name of a repository.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository owner (user/organization)
    #[arg(short, long)]
    pub owner: String,

    /// Repository name
    #[arg(short, long)]
    pub repo: String,
}

/// `gu github` subcommands.
#[derive(Subcommand, Debug)]
pub enum GithubCommand {
    /// Request one API path and print the body
    Path {
        /// API path, e.g. "/user"
        path: String,
    },

    /// First and last pages of a repository's commits
    Commits {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// First and last pages of a repository's watchers
    Watchers {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// First and last pages of a directory listing
    Contents {
        #[command(flatten)]
        repo: RepoArgs,

        /// Path in the repository to list contents of
        #[arg(short, long, default_value = "")]
        path: String,
    },

    /// Every repository of a user, an organization, or the caller
    Repos {
        /// User (or with --org, organization) whose repositories to list;
        /// the authenticated caller when omitted
        #[arg(long)]
        owner: Option<String>,

        /// Treat --owner as an organization
        #[arg(long, requires = "owner")]
        org: bool,

        /// Repository type filter (all, owner, member, public, private, ...)
        #[arg(long = "type")]
        repo_type: Option<String>,

        /// Sort field (created, updated, pushed, full_name)
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction (asc, desc)
        #[arg(long)]
        direction: Option<String>,

        /// Visibility filter (all, public, private)
        #[arg(long)]
        visibility: Option<String>,

        /// Affiliation filter (owner, collaborator, organization_member)
        #[arg(long)]
        affiliation: Option<String>,
    },

    /// Every branch of a repository
    Branches {
        #[command(flatten)]
        repo: RepoArgs,

        /// Only protected branches
        #[arg(long)]
        protected: bool,
    },

    /// Every distinct commit across all branches of a repository
    AllCommits {
        #[command(flatten)]
        repo: RepoArgs,
    },
}

/// Supported shells for completion.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["gu", "-vv", "unpushed"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn github_commits_args() {
        let cli =
            Cli::try_parse_from(["gu", "github", "commits", "-o", "octo", "-r", "hello"]).unwrap();
        match cli.command {
            Command::Github {
                command: GithubCommand::Commits { repo },
                auth,
            } => {
                assert_eq!(repo.owner, "octo");
                assert_eq!(repo.repo, "hello");
                assert!(auth.token.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn github_token_after_subcommand() {
        let cli = Cli::try_parse_from(["gu", "github", "path", "/user", "--token", "t"]).unwrap();
        match cli.command {
            Command::Github { auth, .. } => assert_eq!(auth.token.as_deref(), Some("t")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn org_requires_owner() {
        assert!(Cli::try_parse_from(["gu", "github", "repos", "--org"]).is_err());
        assert!(Cli::try_parse_from(["gu", "github", "repos", "--org", "--owner", "x"]).is_ok());
    }

    #[test]
    fn basic_conflicts_with_token() {
        assert!(Cli::try_parse_from(["gu", "github", "--basic", "-t", "x", "path", "/"]).is_err());
    }
}
