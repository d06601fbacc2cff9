//! forge
//!
//! Hosting-service API clients.
//!
//! Only a GitHub client exists: the one API-backed feature is pull
//! request lookup, and only GitHub-flavored hosts expose a compatible
//! endpoint. URL resolution itself never touches an API.

mod github;

pub use github::{ForgeError, GitHubClient};
