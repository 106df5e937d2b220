// GitHub API response types.
// Defines structs for the user, repository, and public event endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Public GitHub user profile (`/users/{login}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub login: String,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub bio: Option<String>,
}

/// Repository summary (`/users/{login}/repos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
}

/// Repository reference inside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

/// Public activity event (`/users/{login}/events/public`).
///
/// The payload stays raw JSON; its shape depends on `kind` and is parsed on
/// demand with [`Event::payload_as`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    pub fn event_kind(&self) -> EventKind {
        EventKind::from_type(&self.kind)
    }

    /// Decode the payload as `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.payload)
    }

    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}", self.repo.name)
    }
}

/// Event type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    Create,
    Release,
    Fork,
    Watch,
    Other,
}

impl EventKind {
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "PushEvent" => EventKind::Push,
            "PullRequestEvent" => EventKind::PullRequest,
            "IssuesEvent" => EventKind::Issues,
            "CreateEvent" => EventKind::Create,
            "ReleaseEvent" => EventKind::Release,
            "ForkEvent" => EventKind::Fork,
            "WatchEvent" => EventKind::Watch,
            _ => EventKind::Other,
        }
    }

    /// Whether events of this kind are rendered in the activity feed.
    pub fn is_meaningful(&self) -> bool {
        !matches!(self, EventKind::Other)
    }
}

/// `PushEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PushPayload {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub commits: Option<Vec<serde_json::Value>>,
}

/// Link to an issue or pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRef {
    pub number: u64,
    pub html_url: String,
}

/// `PullRequestEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: IssueRef,
}

/// `IssuesEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub issue: IssueRef,
}

/// `CreateEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayload {
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub ref_type: String,
}

/// Release summary inside a `ReleaseEvent`.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
}

/// `ReleaseEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleasePayload {
    pub release: Release,
}

/// Fork target inside a `ForkEvent`.
#[derive(Debug, Clone, Deserialize)]
pub struct Forkee {
    pub full_name: String,
    pub html_url: String,
}

/// `ForkEvent` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ForkPayload {
    pub forkee: Forkee,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
