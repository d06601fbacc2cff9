//! repo::spec
//!
//! Repository spec normalization.
//!
//! A spec is the short addressing form a user types after `--repo`. It is
//! normalized into a canonical remote URL exactly once, before any
//! repository access happens.
//!
//! # Accepted forms
//!
//! - `user/repo` - GitHub shorthand
//! - `host/user/repo` - explicit host
//! - a full Git URL (`git://`, `http://`, `https://`, `ssh://`, or
//!   scp-like `git@host:user/repo`), with or without the `.git` suffix
//!
//! An empty spec is not an error: it means "use the local repository".

use thiserror::Error;

const ACCEPTED_FORMS: &str = "\
  user/repo       (e.g. octocat/hello-world)
  host/user/repo  (e.g. github.com/octocat/hello-world)
  Git URL         (e.g. https://github.com/octocat/hello-world.git)";

/// Errors from spec normalization.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The spec matches none of the accepted addressing forms.
    #[error("invalid repository format '{input}'. Accepted forms are:\n{}", ACCEPTED_FORMS)]
    InvalidFormat {
        /// The spec as the user typed it
        input: String,
    },
}

/// Normalize a repository spec into a canonical remote URL.
///
/// Returns `Ok(None)` for an empty spec, which signals "use the local
/// repository". Otherwise the `.git` suffix is appended if missing, URL
/// forms pass through unchanged, and shorthand forms are expanded by
/// slash count: one slash means GitHub, two slashes name the host.
///
/// Pure function; performs no I/O.
///
/// # Example
///
/// ```
/// use git_surf::repo::normalize;
///
/// let url = normalize("octocat/hello-world").unwrap();
/// assert_eq!(url.as_deref(), Some("https://github.com/octocat/hello-world.git"));
/// ```
pub fn normalize(spec: &str) -> Result<Option<String>, SpecError> {
    if spec.is_empty() {
        return Ok(None);
    }

    let mut url = spec.to_string();
    if !url.ends_with(".git") {
        url.push_str(".git");
    }

    if has_url_prefix(&url) {
        return Ok(Some(url));
    }

    match url.chars().filter(|c| *c == '/').count() {
        1 => Ok(Some(format!("https://github.com/{}", url))),
        2 => Ok(Some(format!("https://{}", url))),
        _ => Err(SpecError::InvalidFormat {
            input: spec.to_string(),
        }),
    }
}

/// Check for a recognized URL prefix.
///
/// scp-like SSH (`git@host:path`) counts as a URL form even though it has
/// no scheme.
fn has_url_prefix(spec: &str) -> bool {
    ["git://", "http://", "https://", "ssh://"]
        .iter()
        .any(|scheme| spec.starts_with(scheme))
        || spec.starts_with("git@")
}
