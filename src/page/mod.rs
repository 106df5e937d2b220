// Page rendering target.
// The DOM contract the fetchers write into, plus an in-memory document implementing it.

pub mod document;
pub mod view;

use serde::{Deserialize, Serialize};

pub use document::{ConnectSection, Indicator, PageElement, ProjectSlot, ProjectsSection, StaticPage};
pub use view::{ActivityFeed, ActivityItem, Fragment, ProjectCard, ProjectTag};

/// Stat counters on the page, tagged by `data-stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Repos,
    Followers,
    Following,
    Stars,
}

impl StatKey {
    pub const ALL: [StatKey; 4] = [
        StatKey::Repos,
        StatKey::Followers,
        StatKey::Following,
        StatKey::Stars,
    ];
}

/// Page sections carrying a freshness indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Stats,
    Activity,
}

impl Section {
    /// Name used in indicator tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Stats => "Stats",
            Section::Activity => "Activity",
        }
    }
}

/// Everything the fetchers and orchestrator write into the page.
///
/// Implementations must tolerate missing elements: setters on an absent
/// target do nothing and report `false` where a result is returned.
pub trait RenderTarget {
    fn stat_text(&self, key: StatKey) -> Option<String>;
    fn set_stat(&mut self, key: StatKey, text: &str) -> bool;

    /// Replace the hero paragraph.
    fn set_bio(&mut self, bio: &str) -> bool;
    /// Replace the connect-section summary sentence.
    fn set_connect_summary(&mut self, public_repos: u64) -> bool;

    fn has_projects_container(&self) -> bool;
    fn project_slot_count(&self) -> usize;
    /// Current content of a project placeholder.
    fn project_slot(&self, index: usize) -> Option<ProjectCard>;
    fn fill_project_slot(&mut self, index: usize, card: &ProjectCard);
    fn hide_project_slot(&mut self, index: usize);
    /// Append a centered note to the projects container.
    fn append_projects_message(&mut self, message: &str);
    /// Remove notes left by an earlier render.
    fn clear_projects_messages(&mut self);

    fn has_achievements_anchor(&self) -> bool;
    /// Remove any previously inserted feed and its heading.
    fn clear_activity_feed(&mut self);
    /// Insert the feed and heading after the achievements anchor.
    fn insert_activity_feed(&mut self, feed: &ActivityFeed);

    fn has_indicator(&self, section: Section) -> bool;
    fn set_indicator(&mut self, section: Section, stale: bool, tooltip: &str);
}

/// Sentence shown in the connect section once the repository count is known.
pub fn connect_summary_text(public_repos: u64) -> String {
    format!(
        "You can find me on GitHub where I contribute to various projects and maintain my own {} public repositories.",
        public_repos
    )
}
