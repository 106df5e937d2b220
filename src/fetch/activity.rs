// Activity fetcher.
// Loads recent public events and renders the meaningful ones as a clickable feed.

use crate::cache::{ACTIVITY_KEY, Clock, Storage};
use crate::github::{
    CreatePayload, Event, EventKind, ForkPayload, GitHubApi, IssuesPayload, PullRequestPayload,
    PushPayload, ReleasePayload,
};
use crate::page::{ActivityFeed, ActivityItem, Fragment, RenderTarget};

use super::{FetchContext, FetchOutcome};

/// Events requested from the API.
pub const EVENTS_PER_PAGE: u32 = 15;
/// Feed items shown after filtering.
pub const MAX_FEED_ITEMS: usize = 5;

/// Load public events from cache, falling back to a single GET.
pub async fn load<A, S, C>(ctx: &FetchContext<A, S, C>) -> FetchOutcome<Vec<Event>>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    if let Some(entry) = ctx.cache.get::<Vec<Event>>(ACTIVITY_KEY) {
        tracing::info!("Using cached GitHub activity data");
        return FetchOutcome::cached(entry);
    }

    tracing::info!(user = %ctx.username, "Fetching fresh GitHub activity data");
    match ctx.api.get_public_events(&ctx.username, EVENTS_PER_PAGE).await {
        Ok(events) => {
            ctx.cache.set(ACTIVITY_KEY, &events);
            FetchOutcome::live(events)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching GitHub activity");
            FetchOutcome::failed()
        }
    }
}

/// Render loaded events. A failed load renders an empty list, which leaves
/// the page as it was.
pub fn apply(outcome: &FetchOutcome<Vec<Event>>, target: &mut impl RenderTarget) {
    update_activity_feed(outcome.data.as_deref().unwrap_or_default(), target);
}

/// Load and render in one step.
pub async fn fetch<A, S, C>(
    ctx: &FetchContext<A, S, C>,
    target: &mut impl RenderTarget,
) -> FetchOutcome<Vec<Event>>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    let outcome = load(ctx).await;
    apply(&outcome, target);
    outcome
}

/// Keep recognised event types, in order, capped at five.
pub fn meaningful_events(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.event_kind().is_meaningful())
        .take(MAX_FEED_ITEMS)
        .collect()
}

/// Replace the activity feed with the meaningful subset of `events`.
pub fn update_activity_feed(events: &[Event], target: &mut impl RenderTarget) {
    if events.is_empty() || !target.has_achievements_anchor() {
        return;
    }

    target.clear_activity_feed();

    let items: Vec<ActivityItem> = meaningful_events(events)
        .into_iter()
        .filter_map(|event| {
            let item = describe(event);
            if item.is_none() {
                tracing::warn!(kind = %event.kind, "Skipping event with unexpected payload");
            }
            item
        })
        .collect();

    if items.is_empty() {
        tracing::debug!("No recent meaningful GitHub activity to display");
        return;
    }

    target.insert_activity_feed(&ActivityFeed::new(items));
}

/// Build the feed item for one event.
///
/// Returns `None` for unrecognised types and payloads that do not match
/// their event type.
pub fn describe(event: &Event) -> Option<ActivityItem> {
    let repo_name = event.repo.name.as_str();
    let repo_url = event.repo_url();
    let repo_link = || Fragment::link(repo_name, repo_url.as_str());

    let (icon, action, target_url) = match event.event_kind() {
        EventKind::Push => {
            let push: PushPayload = event.payload_as().ok()?;
            let branch = push.ref_name.rsplit('/').next().unwrap_or_default();
            let commits = push.commits.map_or(0, |c| c.len());
            let noun = if commits == 1 { "commit" } else { "commits" };
            (
                "fas fa-arrow-up",
                vec![
                    Fragment::text(format!("Pushed {} {} to ", commits, noun)),
                    Fragment::link(repo_name, format!("{}/tree/{}", repo_url, branch)),
                ],
                repo_url.clone(),
            )
        }
        EventKind::PullRequest => {
            let pr: PullRequestPayload = event.payload_as().ok()?;
            let url = pr.pull_request.html_url;
            (
                "fas fa-code-pull-request",
                vec![
                    Fragment::text(format!("{} pull request ", capitalize(&pr.action))),
                    Fragment::link(format!("#{}", pr.pull_request.number), url.as_str()),
                    Fragment::text(" in "),
                    repo_link(),
                ],
                url,
            )
        }
        EventKind::Issues => {
            let issues: IssuesPayload = event.payload_as().ok()?;
            let url = issues.issue.html_url;
            (
                "fas fa-circle-exclamation",
                vec![
                    Fragment::text(format!("{} issue ", capitalize(&issues.action))),
                    Fragment::link(format!("#{}", issues.issue.number), url.as_str()),
                    Fragment::text(" in "),
                    repo_link(),
                ],
                url,
            )
        }
        EventKind::Create => {
            let create: CreatePayload = event.payload_as().ok()?;
            let action = match create.ref_type.as_str() {
                "repository" => vec![Fragment::text("Created repository "), repo_link()],
                "branch" | "tag" => vec![
                    Fragment::text(format!("Created {} ", create.ref_type)),
                    Fragment::strong(create.ref_name.unwrap_or_default()),
                    Fragment::text(" in "),
                    repo_link(),
                ],
                _ => vec![Fragment::text("Created something in "), repo_link()],
            };
            ("fas fa-plus", action, repo_url.clone())
        }
        EventKind::Release => {
            let release: ReleasePayload = event.payload_as().ok()?;
            let url = release.release.html_url;
            (
                "fas fa-tag",
                vec![
                    Fragment::text("Published release "),
                    Fragment::link(release.release.tag_name, url.as_str()),
                    Fragment::text(" for "),
                    repo_link(),
                ],
                url,
            )
        }
        EventKind::Fork => {
            let fork: ForkPayload = event.payload_as().ok()?;
            let url = fork.forkee.html_url;
            (
                "fas fa-code-branch",
                vec![
                    Fragment::text("Forked "),
                    repo_link(),
                    Fragment::text(" to "),
                    Fragment::link(fork.forkee.full_name, url.as_str()),
                ],
                url,
            )
        }
        EventKind::Watch => (
            "fas fa-star",
            vec![Fragment::text("Starred repository "), repo_link()],
            repo_url.clone(),
        ),
        EventKind::Other => return None,
    };

    Some(ActivityItem {
        icon: icon.to_string(),
        action,
        date: event.created_at.format("%b %-d, %Y").to_string(),
        target_url,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::{ExpiringCache, ManualClock, MemoryStorage};
    use crate::fetch::FetchStatus;
    use crate::fetch::testing::{FakeApi, T0, event};
    use crate::page::StaticPage;

    fn ctx(api: FakeApi) -> FetchContext<FakeApi, MemoryStorage, ManualClock> {
        let cache = ExpiringCache::with_clock(MemoryStorage::new(), ManualClock::new(T0));
        FetchContext::new(api, cache, "octo")
    }

    fn push(commits: usize) -> Event {
        event(
            "PushEvent",
            json!({"ref": "refs/heads/feature/x", "commits": vec![json!({}); commits]}),
        )
    }

    #[test]
    fn test_filter_keeps_recognised_in_order() {
        let events = vec![
            push(1),
            event("GollumEvent", json!({})),
            event("WatchEvent", json!({"action": "started"})),
        ];
        let kept = meaningful_events(&events);
        let kinds: Vec<&str> = kept.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["PushEvent", "WatchEvent"]);
    }

    #[test]
    fn test_filter_caps_at_five() {
        let events: Vec<Event> = (0..8).map(|_| push(2)).collect();
        assert_eq!(meaningful_events(&events).len(), 5);
    }

    #[test]
    fn test_push_wording_and_branch_link() {
        let one = describe(&push(1)).unwrap();
        assert_eq!(one.plain_text(), "Pushed 1 commit to octo/folio");
        assert_eq!(one.icon, "fas fa-arrow-up");
        assert_eq!(
            one.action[1],
            Fragment::link("octo/folio", "https://github.com/octo/folio/tree/x")
        );
        assert_eq!(one.date, "May 1, 2024");

        assert_eq!(describe(&push(3)).unwrap().plain_text(), "Pushed 3 commits to octo/folio");

        let no_commits = event("PushEvent", json!({"ref": "refs/heads/main"}));
        assert_eq!(describe(&no_commits).unwrap().plain_text(), "Pushed 0 commits to octo/folio");
    }

    #[test]
    fn test_pull_request_and_issue() {
        let pr = event(
            "PullRequestEvent",
            json!({"action": "opened", "pull_request": {"number": 7, "html_url": "https://github.com/octo/folio/pull/7"}}),
        );
        let item = describe(&pr).unwrap();
        assert_eq!(item.plain_text(), "Opened pull request #7 in octo/folio");
        assert_eq!(item.target_url, "https://github.com/octo/folio/pull/7");

        let issue = event(
            "IssuesEvent",
            json!({"action": "closed", "issue": {"number": 3, "html_url": "https://github.com/octo/folio/issues/3"}}),
        );
        let item = describe(&issue).unwrap();
        assert_eq!(item.plain_text(), "Closed issue #3 in octo/folio");
        assert_eq!(item.icon, "fas fa-circle-exclamation");
        assert_eq!(item.target_url, "https://github.com/octo/folio/issues/3");
    }

    #[test]
    fn test_create_variants() {
        let repo = event("CreateEvent", json!({"ref": null, "ref_type": "repository"}));
        assert_eq!(describe(&repo).unwrap().plain_text(), "Created repository octo/folio");

        let tag = event("CreateEvent", json!({"ref": "v1.0", "ref_type": "tag"}));
        let item = describe(&tag).unwrap();
        assert_eq!(item.plain_text(), "Created tag v1.0 in octo/folio");
        assert_eq!(item.action[1], Fragment::strong("v1.0"));

        let other = event("CreateEvent", json!({"ref_type": "wiki"}));
        assert_eq!(describe(&other).unwrap().plain_text(), "Created something in octo/folio");
        assert_eq!(describe(&other).unwrap().target_url, "https://github.com/octo/folio");
    }

    #[test]
    fn test_release_fork_watch() {
        let release = event(
            "ReleaseEvent",
            json!({"release": {"tag_name": "v2", "html_url": "https://github.com/octo/folio/releases/v2"}}),
        );
        let item = describe(&release).unwrap();
        assert_eq!(item.plain_text(), "Published release v2 for octo/folio");
        assert_eq!(item.target_url, "https://github.com/octo/folio/releases/v2");

        let fork = event(
            "ForkEvent",
            json!({"forkee": {"full_name": "me/folio", "html_url": "https://github.com/me/folio"}}),
        );
        let item = describe(&fork).unwrap();
        assert_eq!(item.plain_text(), "Forked octo/folio to me/folio");
        assert_eq!(item.target_url, "https://github.com/me/folio");

        let watch = event("WatchEvent", json!({"action": "started"}));
        let item = describe(&watch).unwrap();
        assert_eq!(item.plain_text(), "Starred repository octo/folio");
        assert_eq!(item.target_url, "https://github.com/octo/folio");
    }

    #[test]
    fn test_malformed_payload_skipped() {
        let bad = event("ReleaseEvent", json!({"release": null}));
        assert!(describe(&bad).is_none());
        assert!(describe(&event("GollumEvent", json!({}))).is_none());
    }

    #[test]
    fn test_feed_replaced_and_cleared() {
        let mut page = StaticPage::default();
        update_activity_feed(&[push(1)], &mut page);
        assert_eq!(page.feed().unwrap().items.len(), 1);

        update_activity_feed(&[push(1), push(2)], &mut page);
        assert_eq!(page.feed().unwrap().items.len(), 2);

        // Nothing meaningful: the old feed and heading go away.
        update_activity_feed(&[event("GollumEvent", json!({}))], &mut page);
        assert!(page.feed().is_none());
    }

    #[test]
    fn test_empty_input_keeps_existing_feed() {
        let mut page = StaticPage::default();
        update_activity_feed(&[push(1)], &mut page);
        update_activity_feed(&[], &mut page);
        assert!(page.feed().is_some());
    }

    #[tokio::test]
    async fn test_live_then_cached() {
        let ctx = ctx(FakeApi {
            events: Some(vec![push(2)]),
            ..FakeApi::default()
        });
        let mut page = StaticPage::default();

        let live = fetch(&ctx, &mut page).await;
        assert_eq!(live.status, FetchStatus::Live);
        assert_eq!(page.feed().unwrap().heading, "Recent GitHub Activity");

        let cached = load(&ctx).await;
        assert_eq!(cached.status, FetchStatus::Cached);
        assert_eq!(cached.data.unwrap(), vec![push(2)]);
        assert_eq!(ctx.api.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_renders_nothing() {
        let ctx = ctx(FakeApi::default());
        let mut page = StaticPage::default();

        let outcome = fetch(&ctx, &mut page).await;
        assert_eq!(outcome.status, FetchStatus::Failed);
        assert!(page.feed().is_none());
    }
}
