// Page-load entry point.
// Wires the theme controller, scroll reveal, and GitHub fetch cycle in load order.

use crate::cache::{Clock, Storage};
use crate::fetch::{FetchContext, LoadReport, StaticFallback, orchestrator};
use crate::github::GitHubApi;
use crate::page::RenderTarget;
use crate::reveal::{IntersectionEntry, RevealTarget, ScrollReveal};
use crate::theme::{Theme, ThemeController, ThemeHost};

/// Portfolio page enhancer.
pub struct Portfolio<A, S, C> {
    ctx: FetchContext<A, S, C>,
    theme: ThemeController,
    reveal: Option<ScrollReveal>,
}

impl<A, S, C> Portfolio<A, S, C>
where
    A: GitHubApi,
    S: Storage,
    C: Clock,
{
    pub fn new(ctx: FetchContext<A, S, C>) -> Self {
        Self {
            ctx,
            theme: ThemeController::new(),
            reveal: None,
        }
    }

    pub fn context(&self) -> &FetchContext<A, S, C> {
        &self.ctx
    }

    /// Run the page-load sequence: theme, scroll reveal, fallback capture,
    /// then the concurrent GitHub fetches.
    pub async fn on_load<T>(&mut self, target: &mut T) -> LoadReport
    where
        T: RenderTarget + ThemeHost + RevealTarget,
    {
        let theme = self.theme.init(target);
        tracing::debug!(%theme, "Theme applied");

        self.reveal = Some(ScrollReveal::setup(&*target));

        let fallback = StaticFallback::capture(&*target);
        orchestrator::run(&self.ctx, &fallback, target).await
    }

    /// Theme toggle control handler.
    pub fn toggle_theme(&self, target: &mut impl ThemeHost) -> Theme {
        self.theme.toggle(target)
    }

    /// Forward viewport intersection changes to the reveal watcher.
    /// Does nothing before `on_load`.
    pub fn on_intersection(
        &self,
        entries: &[IntersectionEntry],
        target: &mut impl RevealTarget,
    ) -> usize {
        self.reveal
            .as_ref()
            .map_or(0, |reveal| reveal.handle(entries, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ExpiringCache, ManualClock, MemoryStorage};
    use crate::fetch::FetchStatus;
    use crate::fetch::testing::{FakeApi, T0, profile, repo};
    use crate::page::{Section, StatKey, StaticPage};
    use crate::reveal::VISIBLE_CLASS;

    fn portfolio(api: FakeApi) -> Portfolio<FakeApi, MemoryStorage, ManualClock> {
        let cache = ExpiringCache::with_clock(MemoryStorage::new(), ManualClock::new(T0));
        Portfolio::new(FetchContext::new(api, cache, "octo"))
    }

    #[tokio::test]
    async fn test_on_load_full_sequence() {
        let mut portfolio = portfolio(FakeApi {
            profile: Some(profile()),
            repo_pages: vec![vec![repo("a", 3, false, "2024-01-01T00:00:00Z")]],
            ..FakeApi::default()
        });
        let mut page = StaticPage {
            prefers_dark: true,
            ..StaticPage::default()
        };

        let report = portfolio.on_load(&mut page).await;

        assert!(page.has_dark_class());
        assert_eq!(page.css_variables["--bg-color-rgb"], "255, 255, 255");
        assert_eq!(report.stats.status, FetchStatus::Live);
        assert_eq!(report.activity.status, FetchStatus::Failed);
        assert_eq!(page.stat_text(StatKey::Repos).as_deref(), Some("12"));
        assert!(page.indicator(Section::Activity).unwrap().stale);
    }

    #[tokio::test]
    async fn test_reveal_after_load() {
        let mut portfolio = portfolio(FakeApi::default());
        let mut page = StaticPage::default();

        assert_eq!(
            portfolio.on_intersection(&[IntersectionEntry::new("about", 1.0)], &mut page),
            0
        );

        portfolio.on_load(&mut page).await;
        portfolio.on_intersection(&[IntersectionEntry::new("about", 0.5)], &mut page);
        assert!(page.element("about").unwrap().has_class(VISIBLE_CLASS));
        assert!(!page.element("home").unwrap().has_class(VISIBLE_CLASS));
    }

    #[test]
    fn test_toggle_theme_persists() {
        let portfolio = portfolio(FakeApi::default());
        let mut page = StaticPage::default();

        assert_eq!(portfolio.toggle_theme(&mut page), Theme::Dark);
        assert_eq!(page.stored_theme, Some(Theme::Dark));
        assert_eq!(portfolio.toggle_theme(&mut page), Theme::Light);
    }
}
