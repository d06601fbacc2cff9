//! repo
//!
//! Repository addressing and access.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Spec normalization turns a
//! user-supplied addressing form into a canonical remote URL; the handle
//! then acquires that repository's metadata - in memory from the network,
//! or read-only from the filesystem. No other module should import `git2`.
//!
//! # Responsibilities
//!
//! - Repository spec normalization (pure)
//! - Remote metadata acquisition and local repository opening
//! - Remote enumeration (name -> URL)
//! - Revision resolution to full commit ids
//! - Current branch / HEAD reporting

mod handle;
mod spec;

pub use handle::{LocalRepo, RemoteMetadata, RepoError, RepoHandle, ResolvedRef};
pub use spec::{normalize, SpecError};
