//! repo::handle
//!
//! Repository acquisition and metadata access.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. All repository reads flow
//! through [`RepoHandle`]; no other module imports `git2`.
//!
//! A handle is constructed exactly once per invocation and comes in two
//! flavors, fixed at construction time:
//!
//! - **Remote**: metadata fetched over the network from a canonical URL.
//!   Only the advertised refs and the default branch are acquired, and
//!   they are held in memory for the lifetime of the handle - nothing is
//!   written to disk.
//! - **Local**: a repository on the filesystem, opened read-only via
//!   git2 discovery.
//!
//! # Error Handling
//!
//! Failures are categorized into typed variants:
//! - [`RepoError::CloneFailed`]: network acquisition failed
//! - [`RepoError::OpenFailed`]: the directory is not a repository
//! - [`RepoError::NoRemote`]: no remotes are configured
//! - [`RepoError::RefNotFound`]: a revision could not be resolved

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from repository acquisition and metadata access.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Network acquisition of remote metadata failed.
    #[error("failed to fetch repository metadata for {url}: {message}")]
    CloneFailed {
        /// The canonical remote URL
        url: String,
        /// The underlying cause
        message: String,
    },

    /// The directory could not be opened as a repository.
    #[error("failed to open repository at {path}: {message}")]
    OpenFailed {
        /// The path that was searched
        path: PathBuf,
        /// The underlying cause
        message: String,
    },

    /// No remotes are configured for a filesystem-backed repository.
    #[error("repository has no configured remote")]
    NoRemote,

    /// A revision string could not be resolved to a commit.
    #[error("could not resolve '{name}' to a commit")]
    RefNotFound {
        /// The revision as the user gave it
        name: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for RepoError {
    fn from(err: git2::Error) -> Self {
        RepoError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// A resolved revision.
///
/// `commit` is always the full commit id. `name` is set when the input
/// named a branch or tag directly; URLs preserve such names verbatim
/// while everything else substitutes the commit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Full commit id
    pub commit: String,
    /// Branch or tag name, when the input named one
    pub name: Option<String>,
}

impl ResolvedRef {
    /// The value to substitute into a URL template.
    pub fn url_ref(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.commit)
    }
}

/// An opened repository.
///
/// Exactly one variant is chosen at construction time and never swapped.
#[derive(Debug)]
pub enum RepoHandle {
    /// Metadata fetched from a remote URL, held only in memory.
    Remote(RemoteMetadata),
    /// A repository on the local filesystem.
    Local(LocalRepo),
}

impl RepoHandle {
    /// Open a repository from a canonical URL or a local directory.
    ///
    /// With a URL, remote metadata is acquired over the network and the
    /// directory is ignored. Without one, `dir` (or the current working
    /// directory) is opened via git2 discovery. Exactly one of the two
    /// branches executes per call.
    ///
    /// # Errors
    ///
    /// - [`RepoError::CloneFailed`] when the network acquisition fails
    /// - [`RepoError::OpenFailed`] when the directory is not a repository
    pub fn open(url: Option<&str>, dir: Option<&Path>) -> Result<Self, RepoError> {
        match url {
            Some(url) => Ok(RepoHandle::Remote(RemoteMetadata::fetch(url)?)),
            None => {
                let path = match dir {
                    Some(dir) => dir.to_path_buf(),
                    None => std::env::current_dir().map_err(|err| RepoError::OpenFailed {
                        path: PathBuf::from("."),
                        message: err.to_string(),
                    })?,
                };
                Ok(RepoHandle::Local(LocalRepo::open(&path)?))
            }
        }
    }

    /// Configured remotes as (name, url) pairs.
    ///
    /// A remote handle reports its own URL as `origin`.
    pub fn remotes(&self) -> Result<Vec<(String, String)>, RepoError> {
        match self {
            RepoHandle::Remote(remote) => {
                Ok(vec![("origin".to_string(), remote.url.clone())])
            }
            RepoHandle::Local(local) => local.remotes(),
        }
    }

    /// URL of the remote used for host detection.
    ///
    /// Prefers `origin`; falls back to the first configured remote.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NoRemote`] when no remotes are configured
    pub fn primary_remote_url(&self) -> Result<String, RepoError> {
        let remotes = self.remotes()?;
        if let Some((_, url)) = remotes.iter().find(|(name, _)| name == "origin") {
            return Ok(url.clone());
        }
        remotes
            .into_iter()
            .next()
            .map(|(_, url)| url)
            .ok_or(RepoError::NoRemote)
    }

    /// Resolve a revision string to a commit.
    ///
    /// Branch and tag names are reported as named so URLs can preserve
    /// them; anything else (`HEAD`, `HEAD~3`, full or abbreviated
    /// hashes) resolves to a bare commit id.
    ///
    /// # Errors
    ///
    /// - [`RepoError::RefNotFound`] naming the revision
    pub fn resolve(&self, rev: &str) -> Result<ResolvedRef, RepoError> {
        match self {
            RepoHandle::Remote(remote) => remote.resolve(rev),
            RepoHandle::Local(local) => local.resolve(rev),
        }
    }

    /// The commit the repository is currently checked out at.
    ///
    /// For a remote handle this is the commit the default branch points
    /// at.
    pub fn head(&self) -> Result<ResolvedRef, RepoError> {
        match self {
            RepoHandle::Remote(remote) => remote.head(),
            RepoHandle::Local(local) => local.head(),
        }
    }

    /// The currently checked-out branch.
    ///
    /// Returns `None` for a detached HEAD. A remote handle reports the
    /// default branch.
    pub fn current_branch(&self) -> Result<Option<String>, RepoError> {
        match self {
            RepoHandle::Remote(remote) => Ok(remote.default_branch()),
            RepoHandle::Local(local) => local.current_branch(),
        }
    }
}

/// Remote repository metadata acquired in memory.
///
/// Holds the refs the remote advertises (ls-remote style) plus the
/// default branch. Sufficient for URL resolution; object contents are
/// never fetched and nothing touches disk.
#[derive(Debug)]
pub struct RemoteMetadata {
    url: String,
    /// Advertised refs: full ref name -> commit id
    refs: Vec<(String, String)>,
    /// Symref target of HEAD, e.g. `refs/heads/main`
    head_target: Option<String>,
    /// Commit id HEAD points at
    head_commit: Option<String>,
}

impl RemoteMetadata {
    /// Fetch the advertised refs of `url` through a detached anonymous
    /// remote. Blocks until the remote answers or errors; no timeout is
    /// imposed here.
    fn fetch(url: &str) -> Result<Self, RepoError> {
        let clone_failed = |err: git2::Error| RepoError::CloneFailed {
            url: url.to_string(),
            message: err.message().to_string(),
        };

        let mut remote = git2::Remote::create_detached(url).map_err(clone_failed)?;
        remote
            .connect(git2::Direction::Fetch)
            .map_err(clone_failed)?;

        let mut refs = Vec::new();
        let mut head_target = None;
        let mut head_commit = None;
        for head in remote.list().map_err(clone_failed)? {
            if head.name() == "HEAD" {
                head_commit = Some(head.oid().to_string());
                head_target = head.symref_target().map(str::to_string);
            } else {
                refs.push((head.name().to_string(), head.oid().to_string()));
            }
        }

        Ok(Self {
            url: url.to_string(),
            refs,
            head_target,
            head_commit,
        })
    }

    /// Build metadata from a fixed ref list, bypassing the network.
    #[cfg(test)]
    pub(crate) fn with_refs(
        url: &str,
        refs: &[(&str, &str)],
        head_target: Option<&str>,
        head_commit: Option<&str>,
    ) -> Self {
        Self {
            url: url.to_string(),
            refs: refs
                .iter()
                .map(|(name, oid)| (name.to_string(), oid.to_string()))
                .collect(),
            head_target: head_target.map(str::to_string),
            head_commit: head_commit.map(str::to_string),
        }
    }

    fn lookup(&self, refname: &str) -> Option<&str> {
        self.refs
            .iter()
            .find(|(name, _)| name == refname)
            .map(|(_, oid)| oid.as_str())
    }

    fn resolve(&self, rev: &str) -> Result<ResolvedRef, RepoError> {
        if rev == "HEAD" {
            return self.head();
        }

        // Branch names win over tag names, matching rev-parse precedence
        // closely enough for advertised refs.
        if let Some(oid) = self.lookup(&format!("refs/heads/{}", rev)) {
            return Ok(ResolvedRef {
                commit: oid.to_string(),
                name: Some(rev.to_string()),
            });
        }

        // For annotated tags the peeled entry carries the commit id.
        let peeled = format!("refs/tags/{}^{{}}", rev);
        if let Some(oid) = self
            .lookup(&peeled)
            .or_else(|| self.lookup(&format!("refs/tags/{}", rev)))
        {
            return Ok(ResolvedRef {
                commit: oid.to_string(),
                name: Some(rev.to_string()),
            });
        }

        self.resolve_hash(rev)
    }

    /// Match a full or abbreviated hash against advertised tips.
    ///
    /// Without object contents only advertised commits can be matched;
    /// an ambiguous abbreviation is rejected rather than guessed at.
    fn resolve_hash(&self, rev: &str) -> Result<ResolvedRef, RepoError> {
        let not_found = || RepoError::RefNotFound {
            name: rev.to_string(),
        };

        if rev.len() < 4 || !rev.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(not_found());
        }

        let needle = rev.to_ascii_lowercase();
        let mut candidates: Vec<&str> = self
            .refs
            .iter()
            .map(|(_, oid)| oid.as_str())
            .chain(self.head_commit.as_deref())
            .filter(|oid| oid.starts_with(&needle))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        match candidates.as_slice() {
            [oid] => Ok(ResolvedRef {
                commit: oid.to_string(),
                name: None,
            }),
            _ => Err(not_found()),
        }
    }

    fn head(&self) -> Result<ResolvedRef, RepoError> {
        let commit = self.head_commit.clone().ok_or(RepoError::RefNotFound {
            name: "HEAD".to_string(),
        })?;
        Ok(ResolvedRef { commit, name: None })
    }

    /// Default branch name, from the HEAD symref.
    fn default_branch(&self) -> Option<String> {
        self.head_target
            .as_deref()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string)
    }
}

/// A filesystem-backed repository.
///
/// Read-only access; the handle does not own the working directory.
pub struct LocalRepo {
    repo: git2::Repository,
}

impl std::fmt::Debug for LocalRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRepo")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl LocalRepo {
    /// Open the repository containing `path`.
    ///
    /// Uses git2 discovery, so `path` can be any directory within the
    /// repository.
    fn open(path: &Path) -> Result<Self, RepoError> {
        let repo = git2::Repository::discover(path).map_err(|err| RepoError::OpenFailed {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })?;
        Ok(Self { repo })
    }

    fn remotes(&self) -> Result<Vec<(String, String)>, RepoError> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            if let Some(url) = remote.url() {
                remotes.push((name.to_string(), url.to_string()));
            }
        }
        Ok(remotes)
    }

    fn resolve(&self, rev: &str) -> Result<ResolvedRef, RepoError> {
        let not_found = || RepoError::RefNotFound {
            name: rev.to_string(),
        };

        // Check the branch and tag namespaces first so their names are
        // preserved verbatim in URLs.
        for namespace in ["refs/heads/", "refs/tags/", "refs/remotes/"] {
            if let Ok(reference) = self.repo.find_reference(&format!("{}{}", namespace, rev)) {
                let commit = reference.peel_to_commit().map_err(|_| not_found())?;
                return Ok(ResolvedRef {
                    commit: commit.id().to_string(),
                    name: Some(rev.to_string()),
                });
            }
        }

        let object = self.repo.revparse_single(rev).map_err(|_| not_found())?;
        let commit = object
            .peel(git2::ObjectType::Commit)
            .map_err(|_| not_found())?;
        Ok(ResolvedRef {
            commit: commit.id().to_string(),
            name: None,
        })
    }

    fn head(&self) -> Result<ResolvedRef, RepoError> {
        let not_found = || RepoError::RefNotFound {
            name: "HEAD".to_string(),
        };
        let head = self.repo.head().map_err(|_| not_found())?;
        let commit = head.peel_to_commit().map_err(|_| not_found())?;
        Ok(ResolvedRef {
            commit: commit.id().to_string(),
            name: None,
        })
    }

    fn current_branch(&self) -> Result<Option<String>, RepoError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(err) if err.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(name.to_string()));
            }
        }

        Ok(None) // Detached HEAD
    }
}
