// Profile fetcher.
// Loads the user's public profile and writes counters, bio, and summary into the page.

use crate::cache::{Clock, PROFILE_KEY, Storage};
use crate::github::{GitHubApi, Profile};
use crate::page::{RenderTarget, StatKey};

use super::{FetchContext, FetchOutcome};

/// Load the profile from cache, falling back to a single GET.
pub async fn load<A, S, C>(ctx: &FetchContext<A, S, C>) -> FetchOutcome<Profile>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    if let Some(entry) = ctx.cache.get::<Profile>(PROFILE_KEY) {
        tracing::info!("Using cached GitHub profile data");
        return FetchOutcome::cached(entry);
    }

    tracing::info!(user = %ctx.username, "Fetching fresh GitHub profile data");
    match ctx.api.get_user(&ctx.username).await {
        Ok(profile) => {
            ctx.cache.set(PROFILE_KEY, &profile);
            FetchOutcome::live(profile)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching GitHub profile");
            FetchOutcome::failed()
        }
    }
}

/// Render a loaded profile. A failed load leaves the page untouched.
pub fn apply(outcome: &FetchOutcome<Profile>, target: &mut impl RenderTarget) {
    if let Some(profile) = &outcome.data {
        render(profile, target);
    }
}

/// Load and render in one step.
pub async fn fetch<A, S, C>(ctx: &FetchContext<A, S, C>, target: &mut impl RenderTarget) -> FetchOutcome<Profile>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    let outcome = load(ctx).await;
    apply(&outcome, target);
    outcome
}

/// Write profile counters, bio, and the connect summary.
pub fn render(profile: &Profile, target: &mut impl RenderTarget) {
    let counters = [
        (StatKey::Repos, profile.public_repos),
        (StatKey::Followers, profile.followers),
        (StatKey::Following, profile.following),
    ];
    for (key, value) in counters {
        let text = value.map_or_else(|| "...".to_string(), |v| v.to_string());
        target.set_stat(key, &text);
    }

    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        target.set_bio(bio);
    }

    if let Some(public_repos) = profile.public_repos {
        target.set_connect_summary(public_repos);
    }
}
