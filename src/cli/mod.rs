//! cli
//!
//! Command-line interface layer for git-utils.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialize logging and load configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers translate flags into calls on
//! [`crate::forge`], [`crate::git`], and [`crate::core`], and print results
//! through [`crate::ui::output`]. Flags override configuration values.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

/// Shared state for command handlers.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Number of `-v` flags.
    pub verbose: u8,
    /// Loaded configuration.
    pub config: Config,
}

impl Context {
    /// The directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("failed to determine current directory"),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let ctx = Context {
        cwd: cli.cwd.clone(),
        verbose: cli.verbose,
        config,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Default log filter for a `-v` count.
fn default_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,git_utils={}", level)
}

/// Install the stderr subscriber; `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_filter(0), "warn,git_utils=warn");
        assert_eq!(default_filter(1), "warn,git_utils=info");
        assert_eq!(default_filter(2), "warn,git_utils=debug");
        assert_eq!(default_filter(7), "warn,git_utils=trace");
    }

    #[test]
    fn explicit_cwd_is_used() {
        let ctx = Context {
            cwd: Some(PathBuf::from("/tmp/somewhere")),
            ..Context::default()
        };
        assert_eq!(ctx.cwd().unwrap(), PathBuf::from("/tmp/somewhere"));
    }
}
