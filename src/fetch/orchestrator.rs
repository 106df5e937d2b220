// Fetch orchestration.
// Runs the three fetchers concurrently and reports composite freshness on the page indicators.

use serde::{Deserialize, Serialize};

use crate::cache::{Clock, Storage};
use crate::github::GitHubApi;
use crate::page::{RenderTarget, Section};

use super::{FetchContext, FetchStatus, StaticFallback, activity, profile, repos};

/// Cache lifetime the tooltip age assumes, independent of the configured TTL.
pub const TOOLTIP_ASSUMED_TTL_MS: i64 = 3_600_000;

/// A status with the cache expiry backing it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub status: FetchStatus,
    pub expiry: Option<i64>,
}

impl StatusSummary {
    pub fn failed() -> Self {
        Self {
            status: FetchStatus::Failed,
            expiry: None,
        }
    }
}

/// Composite freshness of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub stats: StatusSummary,
    pub activity: StatusSummary,
}

/// Combine the profile and repository statuses for the stats indicator.
///
/// Live only when both are live; cached when either is cached, keeping the
/// earliest expiry; failed otherwise.
pub fn aggregate_stats(profile: StatusSummary, repos: StatusSummary) -> StatusSummary {
    use FetchStatus::*;

    match (profile.status, repos.status) {
        (Live, Live) => StatusSummary {
            status: Live,
            expiry: None,
        },
        (Cached, _) | (_, Cached) => {
            let expiry = match (profile.expiry, repos.expiry) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            StatusSummary {
                status: Cached,
                expiry,
            }
        }
        _ => StatusSummary::failed(),
    }
}

/// Tooltip text for a section indicator.
pub fn indicator_tooltip(section: Section, summary: StatusSummary, now_ms: i64) -> String {
    let prefix = format!("GitHub {}: ", section.label());
    match summary.status {
        FetchStatus::Live => format!("{}Live data.", prefix),
        FetchStatus::Cached => match summary.expiry {
            Some(expiry) => format!(
                "{}Cached data (approx. {} min ago).",
                prefix,
                cache_age_minutes(expiry, now_ms)
            ),
            None => format!("{}Cached data.", prefix),
        },
        FetchStatus::Failed => format!("{}Update failed; showing defaults or cached data.", prefix),
    }
}

/// Minutes since the entry was written, assuming it was written one hour
/// before `expiry`. Rounds half up.
fn cache_age_minutes(expiry: i64, now_ms: i64) -> i64 {
    let written_at = expiry - TOOLTIP_ASSUMED_TTL_MS;
    ((now_ms - written_at) as f64 / 60_000.0 + 0.5).floor() as i64
}

/// Set the stale marker and tooltip on a section indicator.
pub fn update_indicator(
    target: &mut impl RenderTarget,
    section: Section,
    summary: StatusSummary,
    now_ms: i64,
) {
    if !target.has_indicator(section) {
        return;
    }
    let stale = summary.status != FetchStatus::Live;
    target.set_indicator(section, stale, &indicator_tooltip(section, summary, now_ms));
}

/// Run all fetchers concurrently, render their results, and update the
/// freshness indicators.
///
/// `fallback` must be captured before this is called.
pub async fn run<A, S, C>(
    ctx: &FetchContext<A, S, C>,
    fallback: &StaticFallback,
    target: &mut impl RenderTarget,
) -> LoadReport
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    tracing::info!("Initiating GitHub data fetches");

    let (profile_outcome, repos_outcome, activity_outcome) =
        tokio::join!(profile::load(ctx), repos::load(ctx), activity::load(ctx));

    profile::apply(&profile_outcome, target);
    repos::apply(&repos_outcome, fallback, target);
    activity::apply(&activity_outcome, target);

    let report = LoadReport {
        stats: aggregate_stats(profile_outcome.summary(), repos_outcome.summary()),
        activity: activity_outcome.summary(),
    };

    tracing::info!(
        stats = ?report.stats.status,
        activity = ?report.activity.status,
        "GitHub fetches settled"
    );

    let now_ms = ctx.cache.now_ms();
    update_indicator(target, Section::Stats, report.stats, now_ms);
    update_indicator(target, Section::Activity, report.activity, now_ms);

    report
}
