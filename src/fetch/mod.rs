// GitHub data fetchers.
// Cache-then-network loaders for profile, repositories, and activity, plus their orchestration.

pub mod activity;
pub mod orchestrator;
pub mod profile;
pub mod repos;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheEntry, Clock, ExpiringCache, Storage, SystemClock};
use crate::page::{ProjectCard, RenderTarget, StatKey};

pub use orchestrator::{LoadReport, StatusSummary, aggregate_stats, indicator_tooltip};
pub use repos::{RepoSnapshot, select_featured};

/// Where a fetcher's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Live,
    Cached,
    Failed,
}

/// Result of one fetcher run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub status: FetchStatus,
    /// Cache expiry in epoch milliseconds, set for cached data.
    pub expiry: Option<i64>,
    pub data: Option<T>,
}

impl<T> FetchOutcome<T> {
    pub fn live(data: T) -> Self {
        Self {
            status: FetchStatus::Live,
            expiry: None,
            data: Some(data),
        }
    }

    pub fn cached(entry: CacheEntry<T>) -> Self {
        Self {
            status: FetchStatus::Cached,
            expiry: Some(entry.expiry),
            data: Some(entry.value),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: FetchStatus::Failed,
            expiry: None,
            data: None,
        }
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary {
            status: self.status,
            expiry: self.expiry,
        }
    }
}

/// Shared state for a fetch cycle: the API, the cache, and whose data to load.
pub struct FetchContext<A, S, C = SystemClock> {
    pub api: A,
    pub cache: ExpiringCache<S, C>,
    pub username: String,
}

impl<A, S: Storage, C: Clock> FetchContext<A, S, C> {
    pub fn new(api: A, cache: ExpiringCache<S, C>, username: impl Into<String>) -> Self {
        Self {
            api,
            cache,
            username: username.into(),
        }
    }
}

/// Page content captured before any fetch starts, restored when repositories
/// cannot be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFallback {
    pub stars: Option<String>,
    pub projects: Vec<ProjectCard>,
}

impl StaticFallback {
    pub fn capture(target: &impl RenderTarget) -> Self {
        let projects = (0..target.project_slot_count())
            .filter_map(|i| target.project_slot(i))
            .collect();
        Self {
            stars: target.stat_text(StatKey::Stars),
            projects,
        }
    }
}
