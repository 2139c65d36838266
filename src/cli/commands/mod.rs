//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves flags against the loaded configuration
//! 2. Calls into the library
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! GitHub commands are async because they involve network I/O. Their
//! handlers create a tokio runtime and block on the async implementation.

mod completion;
mod github;
mod remote_tags;
mod status;
mod unpushed;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use github::{credentials, github};
pub use remote_tags::remote_tags;
pub use status::status;
pub use unpushed::unpushed;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Github { auth, command } => github::github(ctx, &auth, command),
        Command::RemoteTags {
            repository,
            default_scheme,
            default_host,
        } => remote_tags::remote_tags(
            ctx,
            &repository,
            default_scheme.as_deref(),
            default_host.as_deref(),
        ),
        Command::Status { dirs, maxdepth } => status::status(ctx, &dirs, maxdepth),
        Command::Unpushed {
            abort_on_clone_failure,
        } => unpushed::unpushed(ctx, abort_on_clone_failure),
        Command::Completion { shell } => completion::completion(shell),
    }
}
