//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! The surface is flat flags plus one optional positional target; there
//! are no subcommands. `-h`/`--help` and `-V`/`--version` come from
//! clap and exit 0.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// Open a repository, commit, file, or diff in the web browser
#[derive(Parser, Debug)]
#[command(name = "git-surf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Open the current repository at its checked-out commit
    git surf

    # Open a specific GitHub repository
    git surf -r octocat/hello-world

    # Print the URL instead of opening it
    git surf -u

    # Open a branch
    git surf main

    # Open a file with a line range
    git surf 'main:src/lib.rs#L10-L20'

    # Open the diff between two tags
    git surf 'v1.0...v2.0'

    # Open the pull request page for the current branch
    git surf --pr")]
pub struct Cli {
    /// Repository to browse: 'user/repo', 'host/user/repo', or a Git URL
    #[arg(short, long, value_name = "SPEC")]
    pub repo: Option<String>,

    /// Path to the repository directory
    #[arg(short, long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Print the URL to stdout instead of opening it in a browser
    #[arg(short, long)]
    pub url: bool,

    /// Branch to look up when opening a pull request page
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Open the pull request page for the branch instead of the repository
    #[arg(long)]
    pub pr: bool,

    /// Generate shell completions on stdout and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<Shell>,

    /// REV, 'REV:PATH', 'REV:PATH#L10-L20', or 'LHS...RHS' to browse
    #[arg(value_name = "TARGET")]
    pub args: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
