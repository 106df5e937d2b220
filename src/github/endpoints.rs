// GitHub API endpoint functions.
// Typed reads for the profile, repository, and public event endpoints.

use std::future::Future;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Event, Profile, Repository};

/// The read-only GitHub calls a page load needs.
///
/// Implemented by [`GitHubClient`]; tests supply canned responses.
pub trait GitHubApi: Send + Sync {
    /// Fetch a user's public profile.
    fn get_user(&self, login: &str) -> impl Future<Output = Result<Profile>> + Send;

    /// Fetch one page of a user's public repositories.
    fn get_user_repos(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<Repository>>> + Send;

    /// Fetch a user's most recent public events.
    fn get_public_events(
        &self,
        login: &str,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;
}

impl GitHubApi for GitHubClient {
    async fn get_user(&self, login: &str) -> Result<Profile> {
        let response = self.get(&format!("/users/{}", login)).await?;
        let profile: Profile = response.json().await?;
        Ok(profile)
    }

    async fn get_user_repos(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", login), &params)
            .await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }

    async fn get_public_events(&self, login: &str, per_page: u32) -> Result<Vec<Event>> {
        let params = [("per_page", per_page.to_string())];
        let response = self
            .get_with_params(&format!("/users/{}/events/public", login), &params)
            .await?;
        let events: Vec<Event> = response.json().await?;
        Ok(events)
    }
}
