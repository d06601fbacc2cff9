//! forge::github
//!
//! GitHub pull request lookup over the REST API.
//!
//! # Design
//!
//! A single endpoint is queried: `GET /repos/{owner}/{repo}/pulls`
//! filtered by head branch. Requests are unauthenticated, which is
//! sufficient for public repositories; rate limiting or a private
//! repository surfaces as a status error.
//!
//! The API base is injectable so GitHub Enterprise installs
//! (`https://host/api/v3`) and tests use the same code path.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// User-Agent header value; GitHub rejects requests without one.
const USER_AGENT_VALUE: &str = "git-surf";

/// Errors from the GitHub API.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Transport-level failure.
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API returned status {status} for {url}")]
    Status {
        /// The HTTP status code
        status: StatusCode,
        /// The request URL
        url: String,
    },

    /// No open pull request matches the branch.
    #[error("no open pull request for {owner}/{repo} with head branch '{branch}'")]
    PullRequestNotFound {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// The head branch that was searched for
        branch: String,
    },
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    html_url: String,
}

/// Minimal GitHub REST client.
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Create a client against an API base URL.
    ///
    /// Use `https://api.github.com` for github.com or
    /// `https://<host>/api/v3` for GitHub Enterprise.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// URL of the first open pull request whose head is `owner:branch`.
    ///
    /// # Errors
    ///
    /// - [`ForgeError::PullRequestNotFound`] when no open pull request
    ///   has that head branch
    /// - [`ForgeError::Status`] for API failures (rate limits, private
    ///   repositories, unknown repositories)
    pub async fn find_pr_url(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, ForgeError> {
        let url = format!("{}/repos/{}/{}/pulls", self.api_base, owner, repo);
        let head = format!("{}:{}", owner, branch);
        let response = self
            .client
            .get(&url)
            .query(&[("state", "open"), ("head", head.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForgeError::Status { status, url });
        }

        let pulls: Vec<PullRequest> = response.json().await?;
        pulls
            .into_iter()
            .next()
            .map(|pr| pr.html_url)
            .ok_or_else(|| ForgeError::PullRequestNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                branch: branch.to_string(),
            })
    }
}
