//! command
//!
//! Orchestration of one URL resolution.
//!
//! # Design
//!
//! [`Command`] composes the domain modules into `url()` and `open()`:
//! normalize the repo spec, parse the positional arguments, open the
//! repository, detect the host, resolve the URL. Pure shape checks run
//! before any network or filesystem access.
//!
//! Browser launching sits behind the [`BrowserOpener`] trait so tests
//! can capture the URL instead of spawning a browser.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::config::Config;
use crate::forge::GitHubClient;
use crate::host::{self, Host};
use crate::repo::{normalize, RepoHandle};
use crate::resolve;

/// Launches a URL in the platform browser.
///
/// Failures are opaque and surfaced unchanged to the caller.
pub trait BrowserOpener {
    /// Open `url` with the platform default handler.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opener backed by the platform default handler.
pub struct SystemOpener;

impl BrowserOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("failed to open {} in the browser", url))
    }
}

/// One URL resolution, configured from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Command {
    /// Repository spec from `--repo`; empty means the local repository
    pub repo: Option<String>,
    /// Repository directory from `--dir`
    pub dir: Option<PathBuf>,
    /// Branch from `--branch`, for pull request lookup
    pub branch: Option<String>,
    /// Whether `--pr` was given
    pub pull_request: bool,
}

impl Command {
    /// Resolve the positional arguments into a URL.
    pub fn url(&self, args: &[String]) -> Result<String> {
        let spec = self.repo.as_deref().unwrap_or("");
        let remote_url = normalize(spec)?;

        if self.pull_request && !args.is_empty() {
            bail!("--pr does not take positional arguments");
        }
        // Shape checks are pure and run before any repository access.
        let target = resolve::parse(args)?;

        let handle = RepoHandle::open(remote_url.as_deref(), self.dir.as_deref())?;
        let config = Config::load()?;
        let remote = handle.primary_remote_url()?;
        let (host, owner, repo) = host::detect(&remote, &config)?;

        if self.pull_request {
            return self.pull_request_url(&handle, &host, &owner, &repo);
        }

        let url = resolve::resolve(&handle, &host, &owner, &repo, &target)?;
        if url.is_empty() {
            // Unreachable if the resolver upholds its contract; kept so a
            // broken template can never produce an empty success.
            bail!("invalid arguments; see git-surf --help for usage");
        }
        Ok(url)
    }

    /// Resolve the URL and hand it to the opener.
    pub fn open(&self, args: &[String], opener: &dyn BrowserOpener) -> Result<()> {
        let url = self.url(args)?;
        opener.open(&url)
    }

    /// Look up the pull request page for a branch on a GitHub-flavored
    /// host.
    fn pull_request_url(
        &self,
        handle: &RepoHandle,
        host: &Host,
        owner: &str,
        repo: &str,
    ) -> Result<String> {
        let api_base = host
            .api_base()
            .with_context(|| format!("--pr is not supported for {}", host))?;

        let branch = match &self.branch {
            Some(branch) => branch.clone(),
            None => handle
                .current_branch()?
                .context("not on a branch; pass --branch to pick one")?,
        };

        let client = GitHubClient::new(api_base)?;
        let runtime = tokio::runtime::Runtime::new()?;
        let url = runtime.block_on(client.find_pr_url(owner, repo, &branch))?;
        Ok(url)
    }
}
