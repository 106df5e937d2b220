// Repository fetcher.
// Pages through every public repository, totals stars, and picks the featured projects.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cache::{Clock, REPOS_KEY, Storage};
use crate::error::Result;
use crate::github::{GitHubApi, Repository};
use crate::page::view::NO_DESCRIPTION;
use crate::page::{ProjectCard, RenderTarget, StatKey};

use super::{FetchContext, FetchOutcome, StaticFallback};

/// Page size for the repository listing.
pub const PER_PAGE: u32 = 100;
/// Number of featured project slots filled from GitHub.
pub const MAX_FEATURED: usize = 2;
/// Forks need strictly more stars than this to be featured.
pub const FORK_STAR_THRESHOLD: u64 = 10;
/// Shown when no repository qualifies for a featured slot.
pub const NO_PROJECTS_MESSAGE: &str = "Featured projects from GitHub will appear here.";

/// Everything the repository fetcher caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSnapshot {
    pub repos: Vec<Repository>,
    pub total_stars: u64,
}

impl RepoSnapshot {
    pub fn new(repos: Vec<Repository>) -> Self {
        let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
        Self { repos, total_stars }
    }
}

/// Fetch pages sequentially until an empty page comes back.
pub async fn fetch_all_repos(api: &impl GitHubApi, login: &str) -> Result<Vec<Repository>> {
    let mut all_repos = Vec::new();
    let mut page = 1;
    loop {
        let repos = api.get_user_repos(login, page, PER_PAGE).await?;
        if repos.is_empty() {
            break;
        }
        tracing::debug!(page, count = repos.len(), "Fetched repository page");
        all_repos.extend(repos);
        page += 1;
    }
    Ok(all_repos)
}

/// Load the repository snapshot from cache, falling back to the paginated listing.
pub async fn load<A, S, C>(ctx: &FetchContext<A, S, C>) -> FetchOutcome<RepoSnapshot>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    if let Some(entry) = ctx.cache.get::<RepoSnapshot>(REPOS_KEY) {
        tracing::info!("Using cached GitHub repo data");
        return FetchOutcome::cached(entry);
    }

    tracing::info!(user = %ctx.username, "Fetching fresh GitHub repo data");
    match fetch_all_repos(&ctx.api, &ctx.username).await {
        Ok(repos) => {
            let snapshot = RepoSnapshot::new(repos);
            ctx.cache.set(REPOS_KEY, &snapshot);
            FetchOutcome::live(snapshot)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching GitHub repos");
            FetchOutcome::failed()
        }
    }
}

/// Render a loaded snapshot, or restore the captured static content on failure.
pub fn apply(
    outcome: &FetchOutcome<RepoSnapshot>,
    fallback: &StaticFallback,
    target: &mut impl RenderTarget,
) {
    match &outcome.data {
        Some(snapshot) => {
            target.set_stat(StatKey::Stars, &snapshot.total_stars.to_string());
            update_featured_projects(&snapshot.repos, target);
        }
        None => {
            for (i, card) in fallback.projects.iter().enumerate() {
                target.fill_project_slot(i, card);
            }
            target.set_stat(StatKey::Stars, fallback.stars.as_deref().unwrap_or("..."));
        }
    }
}

/// Load and render in one step.
pub async fn fetch<A, S, C>(
    ctx: &FetchContext<A, S, C>,
    fallback: &StaticFallback,
    target: &mut impl RenderTarget,
) -> FetchOutcome<RepoSnapshot>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    let outcome = load(ctx).await;
    apply(&outcome, fallback, target);
    outcome
}

/// Rank repositories and pick up to two worth featuring.
///
/// Most stars first, most recently updated breaking ties; forks only count
/// once they have more than ten stars.
pub fn select_featured(repos: &[Repository]) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    sorted.sort_by(|a, b| compare_featured(a, b));
    sorted
        .into_iter()
        .filter(|r| !r.fork || r.stargazers_count > FORK_STAR_THRESHOLD)
        .take(MAX_FEATURED)
        .collect()
}

fn compare_featured(a: &Repository, b: &Repository) -> Ordering {
    b.stargazers_count
        .cmp(&a.stargazers_count)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

impl From<&Repository> for ProjectCard {
    fn from(repo: &Repository) -> Self {
        ProjectCard {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            description: repo
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            language: repo.language.clone().filter(|l| !l.is_empty()),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
        }
    }
}

/// Fill the project placeholders with the featured repositories.
pub fn update_featured_projects(repos: &[Repository], target: &mut impl RenderTarget) {
    if repos.is_empty() || !target.has_projects_container() {
        return;
    }

    target.clear_projects_messages();
    let featured = select_featured(repos);
    let slots = target.project_slot_count();

    if !featured.is_empty() {
        for (i, repo) in featured.iter().enumerate().take(slots) {
            target.fill_project_slot(i, &ProjectCard::from(*repo));
        }
        for i in featured.len()..slots {
            target.hide_project_slot(i);
        }
    } else if slots > 0 {
        for i in 0..slots {
            target.hide_project_slot(i);
        }
        target.append_projects_message(NO_PROJECTS_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ExpiringCache, ManualClock, MemoryStorage};
    use crate::fetch::FetchStatus;
    use crate::fetch::testing::{FakeApi, T0, repo};
    use crate::page::StaticPage;

    fn ctx(api: FakeApi) -> FetchContext<FakeApi, MemoryStorage, ManualClock> {
        let cache = ExpiringCache::with_clock(MemoryStorage::new(), ManualClock::new(T0));
        FetchContext::new(api, cache, "octo")
    }

    fn names<'a>(repos: &[&'a Repository]) -> Vec<&'a str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_fork_needs_more_than_ten_stars() {
        let repos = vec![
            repo("a", 5, false, "2024-01-01T00:00:00Z"),
            repo("b", 5, false, "2024-01-02T00:00:00Z"),
            repo("fork", 10, true, "2024-01-03T00:00:00Z"),
        ];
        assert_eq!(names(&select_featured(&repos)), vec!["b", "a"]);

        let mut repos = repos;
        repos[2].stargazers_count = 11;
        assert_eq!(names(&select_featured(&repos)), vec!["fork", "b"]);
    }

    #[test]
    fn test_ties_prefer_recent_update() {
        let repos = vec![
            repo("older", 3, false, "2023-06-01T00:00:00Z"),
            repo("newer", 3, false, "2024-06-01T00:00:00Z"),
            repo("top", 9, false, "2020-01-01T00:00:00Z"),
        ];
        assert_eq!(names(&select_featured(&repos)), vec!["top", "newer"]);
    }

    #[test]
    fn test_snapshot_totals_stars() {
        let snapshot = RepoSnapshot::new(vec![
            repo("a", 2, false, "2024-01-01T00:00:00Z"),
            repo("b", 40, true, "2024-01-01T00:00:00Z"),
        ]);
        assert_eq!(snapshot.total_stars, 42);
    }

    #[test]
    fn test_single_featured_hides_second_slot() {
        let mut page = StaticPage::default();
        let mut only = repo("solo", 1, false, "2024-01-01T00:00:00Z");
        only.language = Some("Rust".to_string());
        only.forks_count = 3;

        update_featured_projects(&[only], &mut page);

        let slots = page.project_slots();
        assert_eq!(slots[0].card.name, "solo");
        assert_eq!(slots[0].card.description, NO_DESCRIPTION);
        assert_eq!(slots[0].card.language.as_deref(), Some("Rust"));
        assert_eq!(slots[0].card.forks, 3);
        assert!(!slots[0].hidden);
        assert!(slots[1].hidden);
    }

    #[test]
    fn test_no_qualifying_repos_shows_message() {
        let mut page = StaticPage::default();
        update_featured_projects(&[repo("f", 2, true, "2024-01-01T00:00:00Z")], &mut page);

        assert!(page.project_slots().iter().all(|s| s.hidden));
        assert_eq!(
            page.projects.as_ref().unwrap().messages,
            vec![NO_PROJECTS_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_later_render_replaces_saved_page_state() {
        let mut page = StaticPage::default();
        update_featured_projects(&[repo("a", 5, false, "2024-01-01T00:00:00Z")], &mut page);
        assert!(page.project_slots()[1].hidden);

        let json = serde_json::to_string(&page).unwrap();
        let mut page: StaticPage = serde_json::from_str(&json).unwrap();
        update_featured_projects(
            &[
                repo("a", 5, false, "2024-01-01T00:00:00Z"),
                repo("b", 3, false, "2024-01-01T00:00:00Z"),
            ],
            &mut page,
        );
        let slots = page.project_slots();
        assert_eq!(slots[1].card.name, "b");
        assert!(!slots[1].hidden);

        let forks = [repo("f", 2, true, "2024-01-01T00:00:00Z")];
        for _ in 0..3 {
            update_featured_projects(&forks, &mut page);
        }
        assert_eq!(page.projects.as_ref().unwrap().messages.len(), 1);
    }

    #[test]
    fn test_empty_repo_list_changes_nothing() {
        let mut page = StaticPage::default();
        let before = page.clone();
        update_featured_projects(&[], &mut page);
        assert_eq!(page, before);
    }

    #[tokio::test]
    async fn test_paginates_until_empty_page() {
        let ctx = ctx(FakeApi {
            repo_pages: vec![
                vec![
                    repo("a", 1, false, "2024-01-01T00:00:00Z"),
                    repo("b", 2, false, "2024-01-01T00:00:00Z"),
                ],
                vec![repo("c", 3, false, "2024-01-01T00:00:00Z")],
            ],
            ..FakeApi::default()
        });
        let mut page = StaticPage::default();

        let outcome = fetch(&ctx, &StaticFallback::default(), &mut page).await;
        assert_eq!(outcome.status, FetchStatus::Live);
        assert_eq!(*ctx.api.requested_pages.lock().unwrap(), vec![1, 2, 3]);

        let snapshot = outcome.data.unwrap();
        assert_eq!(snapshot.repos.len(), 3);
        assert_eq!(snapshot.total_stars, 6);
        assert_eq!(page.stat_text(StatKey::Stars).as_deref(), Some("6"));
        assert_eq!(page.project_slots()[0].card.name, "c");

        assert!(ctx.cache.get::<RepoSnapshot>(REPOS_KEY).is_some());
    }

    #[tokio::test]
    async fn test_failure_restores_static_values() {
        let ctx = ctx(FakeApi {
            repos_fail: true,
            ..FakeApi::default()
        });
        let mut page = StaticPage::default();
        page.set_stat(StatKey::Stars, "120");
        let fallback = StaticFallback::capture(&page);
        page.set_stat(StatKey::Stars, "0");

        let outcome = fetch(&ctx, &fallback, &mut page).await;
        assert_eq!(outcome.status, FetchStatus::Failed);
        assert_eq!(page.stat_text(StatKey::Stars).as_deref(), Some("120"));
        assert_eq!(page.project_slots()[0].card, fallback.projects[0]);
        assert!(ctx.cache.get::<RepoSnapshot>(REPOS_KEY).is_none());
    }

    #[tokio::test]
    async fn test_cached_snapshot_used() {
        let ctx = ctx(FakeApi::default());
        ctx.cache.set(
            REPOS_KEY,
            &RepoSnapshot::new(vec![repo("cached", 4, false, "2024-01-01T00:00:00Z")]),
        );
        let mut page = StaticPage::default();

        let outcome = fetch(&ctx, &StaticFallback::default(), &mut page).await;
        assert_eq!(outcome.status, FetchStatus::Cached);
        assert_eq!(outcome.expiry, Some(T0 + 3_600_000));
        assert_eq!(ctx.api.calls(), 0);
        assert_eq!(page.stat_text(StatKey::Stars).as_deref(), Some("4"));
    }
}
