// In-memory portfolio document.
// Holds the page state the fetchers update and persists it as JSON between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::store::write_atomic;
use crate::error::Result;
use crate::reveal::{ElementId, REVEAL_CLASS, RevealTarget};
use crate::theme::{DARK_CLASS, Theme, ThemeHost};

use super::view::{ActivityFeed, ProjectCard};
use super::{RenderTarget, Section, StatKey, connect_summary_text};

/// A project placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectSlot {
    pub card: ProjectCard,
    #[serde(default)]
    pub hidden: bool,
}

/// The `#projects` container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectsSection {
    pub slots: Vec<ProjectSlot>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// The `#connect` container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectSection {
    /// Summary paragraph; `None` when the page has none.
    pub summary: Option<String>,
    /// Whether the achievements anchor exists.
    pub achievements: bool,
    pub feed: Option<ActivityFeed>,
}

/// A freshness indicator element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Indicator {
    pub stale: bool,
    pub title: Option<String>,
}

/// A generic element with classes, used for reveal targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    pub id: ElementId,
    pub classes: Vec<String>,
}

impl PageElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Serializable document implementing every page capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPage {
    /// Persisted theme preference (browser local storage).
    pub stored_theme: Option<Theme>,
    /// OS-level dark color scheme preference.
    pub prefers_dark: bool,
    pub body_classes: Vec<String>,
    pub css_variables: BTreeMap<String, String>,
    pub stats: BTreeMap<StatKey, String>,
    /// Hero paragraph; `None` when the page has none.
    pub bio: Option<String>,
    pub projects: Option<ProjectsSection>,
    pub connect: Option<ConnectSection>,
    pub indicators: BTreeMap<Section, Indicator>,
    pub elements: Vec<PageElement>,
}

impl Default for StaticPage {
    fn default() -> Self {
        let placeholder = |n: u32| ProjectSlot {
            card: ProjectCard {
                name: format!("Project {}", n),
                url: "#".to_string(),
                description: "Loading project details...".to_string(),
                ..ProjectCard::default()
            },
            hidden: false,
        };

        Self {
            stored_theme: None,
            prefers_dark: false,
            body_classes: Vec::new(),
            css_variables: BTreeMap::from([
                ("--bg-color".to_string(), "#ffffff".to_string()),
                ("--accent-color".to_string(), "#0066cc".to_string()),
            ]),
            stats: StatKey::ALL
                .into_iter()
                .map(|key| (key, "...".to_string()))
                .collect(),
            bio: Some(String::new()),
            projects: Some(ProjectsSection {
                slots: vec![placeholder(1), placeholder(2)],
                messages: Vec::new(),
            }),
            connect: Some(ConnectSection {
                summary: Some(String::new()),
                achievements: true,
                feed: None,
            }),
            indicators: BTreeMap::from([
                (Section::Stats, Indicator::default()),
                (Section::Activity, Indicator::default()),
            ]),
            elements: ["home", "about", "projects", "connect"]
                .into_iter()
                .map(|id| PageElement {
                    id: id.into(),
                    classes: vec![REVEAL_CLASS.to_string()],
                })
                .collect(),
        }
    }
}

impl StaticPage {
    /// Load a page from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let page = serde_json::from_str(&contents)?;
        Ok(page)
    }

    /// Load a page, or start from the default markup when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the page as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }

    pub fn element(&self, id: &str) -> Option<&PageElement> {
        self.elements.iter().find(|e| e.id.0 == id)
    }

    pub fn feed(&self) -> Option<&ActivityFeed> {
        self.connect.as_ref().and_then(|c| c.feed.as_ref())
    }

    pub fn indicator(&self, section: Section) -> Option<&Indicator> {
        self.indicators.get(&section)
    }

    pub fn project_slots(&self) -> &[ProjectSlot] {
        self.projects
            .as_ref()
            .map(|p| p.slots.as_slice())
            .unwrap_or_default()
    }
}

impl RenderTarget for StaticPage {
    fn stat_text(&self, key: StatKey) -> Option<String> {
        self.stats.get(&key).cloned()
    }

    fn set_stat(&mut self, key: StatKey, text: &str) -> bool {
        match self.stats.get_mut(&key) {
            Some(value) => {
                *value = text.to_string();
                true
            }
            None => false,
        }
    }

    fn set_bio(&mut self, bio: &str) -> bool {
        match self.bio.as_mut() {
            Some(value) => {
                *value = bio.to_string();
                true
            }
            None => false,
        }
    }

    fn set_connect_summary(&mut self, public_repos: u64) -> bool {
        match self.connect.as_mut().and_then(|c| c.summary.as_mut()) {
            Some(summary) => {
                *summary = connect_summary_text(public_repos);
                true
            }
            None => false,
        }
    }

    fn has_projects_container(&self) -> bool {
        self.projects.is_some()
    }

    fn project_slot_count(&self) -> usize {
        self.project_slots().len()
    }

    fn project_slot(&self, index: usize) -> Option<ProjectCard> {
        self.project_slots().get(index).map(|s| s.card.clone())
    }

    fn fill_project_slot(&mut self, index: usize, card: &ProjectCard) {
        if let Some(slot) = self.projects.as_mut().and_then(|p| p.slots.get_mut(index)) {
            slot.card = card.clone();
            slot.hidden = false;
        }
    }

    fn hide_project_slot(&mut self, index: usize) {
        if let Some(slot) = self.projects.as_mut().and_then(|p| p.slots.get_mut(index)) {
            slot.hidden = true;
        }
    }

    fn append_projects_message(&mut self, message: &str) {
        if let Some(projects) = self.projects.as_mut() {
            projects.messages.push(message.to_string());
        }
    }

    fn clear_projects_messages(&mut self) {
        if let Some(projects) = self.projects.as_mut() {
            projects.messages.clear();
        }
    }

    fn has_achievements_anchor(&self) -> bool {
        self.connect.as_ref().is_some_and(|c| c.achievements)
    }

    fn clear_activity_feed(&mut self) {
        if let Some(connect) = self.connect.as_mut() {
            connect.feed = None;
        }
    }

    fn insert_activity_feed(&mut self, feed: &ActivityFeed) {
        if let Some(connect) = self.connect.as_mut().filter(|c| c.achievements) {
            connect.feed = Some(feed.clone());
        }
    }

    fn has_indicator(&self, section: Section) -> bool {
        self.indicators.contains_key(&section)
    }

    fn set_indicator(&mut self, section: Section, stale: bool, tooltip: &str) {
        if let Some(indicator) = self.indicators.get_mut(&section) {
            indicator.stale = stale;
            indicator.title = Some(tooltip.to_string());
        }
    }
}

impl ThemeHost for StaticPage {
    fn stored_theme(&self) -> Option<Theme> {
        self.stored_theme
    }

    fn store_theme(&mut self, theme: Theme) {
        self.stored_theme = Some(theme);
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn has_dark_class(&self) -> bool {
        self.body_classes.iter().any(|c| c == DARK_CLASS)
    }

    fn set_dark_class(&mut self, dark: bool) {
        self.body_classes.retain(|c| c != DARK_CLASS);
        if dark {
            self.body_classes.push(DARK_CLASS.to_string());
        }
    }

    fn css_variable(&self, name: &str) -> Option<String> {
        self.css_variables.get(name).cloned()
    }

    fn set_css_variable(&mut self, name: &str, value: &str) {
        self.css_variables.insert(name.to_string(), value.to_string());
    }
}

impl RevealTarget for StaticPage {
    fn reveal_elements(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.has_class(REVEAL_CLASS))
            .map(|e| e.id.clone())
            .collect()
    }

    fn add_class(&mut self, element: &ElementId, class: &str) {
        if let Some(el) = self.elements.iter_mut().find(|e| &e.id == element) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_markup() {
        let page = StaticPage::default();
        assert_eq!(page.project_slot_count(), 2);
        assert!(page.has_achievements_anchor());
        assert!(page.has_indicator(Section::Stats));
        assert_eq!(page.stat_text(StatKey::Stars).as_deref(), Some("..."));
        assert_eq!(page.reveal_elements().len(), 4);
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let mut page = StaticPage {
            stats: BTreeMap::new(),
            bio: None,
            projects: None,
            connect: None,
            indicators: BTreeMap::new(),
            ..StaticPage::default()
        };

        assert!(!page.set_stat(StatKey::Repos, "3"));
        assert!(!page.set_bio("hi"));
        assert!(!page.set_connect_summary(3));
        page.fill_project_slot(0, &ProjectCard::default());
        page.insert_activity_feed(&ActivityFeed::new(Vec::new()));
        page.set_indicator(Section::Stats, true, "x");

        assert!(page.feed().is_none());
        assert!(page.indicator(Section::Stats).is_none());
        assert_eq!(page.project_slot_count(), 0);
    }

    #[test]
    fn test_dark_class_toggling() {
        let mut page = StaticPage::default();
        page.set_dark_class(true);
        page.set_dark_class(true);
        assert_eq!(page.body_classes, vec![DARK_CLASS.to_string()]);

        page.set_dark_class(false);
        assert!(!page.has_dark_class());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site").join("page.json");

        let mut page = StaticPage::default();
        page.set_stat(StatKey::Followers, "12");
        page.set_connect_summary(4);
        page.save(&path).unwrap();

        let loaded = StaticPage::load(&path).unwrap();
        assert_eq!(loaded, page);
        assert!(
            loaded.connect.unwrap().summary.unwrap().contains("4 public repositories")
        );
    }

    #[test]
    fn test_failed_save_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(StaticPage::default().save(&path).is_err());
        assert!(!temp_dir.path().join("page.tmp").exists());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let page = StaticPage::load_or_default(&temp_dir.path().join("none.json")).unwrap();
        assert_eq!(page, StaticPage::default());
    }
}
