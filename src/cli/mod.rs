//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Build a [`Command`](crate::command::Command) and run it
//! - Does NOT contain resolution logic
//!
//! The binary prints any error to stderr and exits with code 3; help
//! and version exit 0 via clap.

pub mod args;

pub use args::Cli;

use std::io;

use anyhow::Result;
use clap::CommandFactory;

use crate::command::{Command, SystemOpener};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "git-surf", &mut io::stdout());
        return Ok(());
    }

    let command = Command {
        repo: cli.repo,
        dir: cli.dir,
        branch: cli.branch,
        pull_request: cli.pr,
    };

    if cli.url {
        println!("{}", command.url(&cli.args)?);
        Ok(())
    } else {
        command.open(&cli.args, &SystemOpener)
    }
}
