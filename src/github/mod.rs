// GitHub API module.
// Provides the client, endpoint trait, and types for the public user endpoints.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use endpoints::GitHubApi;
pub use types::*;
