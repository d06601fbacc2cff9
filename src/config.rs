//! config
//!
//! User configuration.
//!
//! # Overview
//!
//! Configuration is a single optional TOML file listing self-hosted
//! services, so remotes on those hosts are detected without relying on
//! the `/owner/repo.git` path-shape fallback:
//!
//! ```toml
//! github_hosts = ["github.example.com"]
//! gitlab_hosts = ["code.example.com"]
//! ```
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$GIT_SURF_CONFIG` if set
//! 2. `<config dir>/git-surf/config.toml`
//!
//! A missing file yields the defaults. The configuration is loaded once
//! per invocation and read-only thereafter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Self-hosted services the user wants recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hosts served with the GitHub template set (e.g. GitHub Enterprise)
    #[serde(default)]
    pub github_hosts: Vec<String>,

    /// Hosts served with the GitLab template set
    #[serde(default)]
    pub gitlab_hosts: Vec<String>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    fn path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("GIT_SURF_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("git-surf").join("config.toml"))
    }
}
