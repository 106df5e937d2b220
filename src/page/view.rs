// View types rendered into the page.
// Project cards, activity feed items, and their HTML serialization.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Fallback text for repositories without a description.
pub const NO_DESCRIPTION: &str = "No description provided.";
/// Heading placed above the activity feed.
pub const ACTIVITY_HEADING: &str = "Recent GitHub Activity";

/// Content of one featured project placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectCard {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
}

/// One tag chip under a project card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectTag {
    Language(String),
    Stars(u64),
    Forks(u64),
}

impl ProjectCard {
    /// Tags in display order: language (if known), stars, forks.
    pub fn tags(&self) -> Vec<ProjectTag> {
        let mut tags = Vec::with_capacity(3);
        if let Some(language) = &self.language {
            tags.push(ProjectTag::Language(language.clone()));
        }
        tags.push(ProjectTag::Stars(self.stars));
        tags.push(ProjectTag::Forks(self.forks));
        tags
    }
}

/// Piece of an activity item's action sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fragment {
    Text { text: String },
    Link { text: String, href: String },
    Strong { text: String },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text { text: text.into() }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Fragment::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Fragment::Strong { text: text.into() }
    }
}

/// One rendered activity event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    /// Font Awesome icon classes.
    pub icon: String,
    pub action: Vec<Fragment>,
    /// Human-readable date, e.g. "May 1, 2024".
    pub date: String,
    /// URL opened when the item is clicked.
    pub target_url: String,
}

impl ActivityItem {
    /// The action sentence without markup.
    pub fn plain_text(&self) -> String {
        self.action
            .iter()
            .map(|f| match f {
                Fragment::Text { text } | Fragment::Link { text, .. } | Fragment::Strong { text } => {
                    text.as_str()
                }
            })
            .collect()
    }

    /// Render the feed item markup.
    pub fn to_html(&self) -> String {
        let mut action = String::new();
        for fragment in &self.action {
            match fragment {
                Fragment::Text { text } => action.push_str(&escape_html(text)),
                Fragment::Link { text, href } => {
                    let _ = write!(
                        action,
                        "<a href=\"{}\" target=\"_blank\">{}</a>",
                        escape_html(href),
                        escape_html(text)
                    );
                }
                Fragment::Strong { text } => {
                    let _ = write!(action, "<strong>{}</strong>", escape_html(text));
                }
            }
        }

        format!(
            "<div class=\"activity-item\" data-href=\"{}\" style=\"cursor: pointer;\">\
             <div class=\"activity-icon\"><i class=\"{}\"></i></div>\
             <div class=\"activity-content\">\
             <div class=\"activity-action\">{}</div>\
             <div class=\"activity-date\">{}</div>\
             </div></div>",
            escape_html(&self.target_url),
            escape_html(&self.icon),
            action,
            escape_html(&self.date)
        )
    }
}

/// The activity feed block inserted after the achievements anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeed {
    pub heading: String,
    pub items: Vec<ActivityItem>,
}

impl ActivityFeed {
    pub fn new(items: Vec<ActivityItem>) -> Self {
        Self {
            heading: ACTIVITY_HEADING.to_string(),
            items,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<h3 class=\"text-center activity-heading\">{}</h3><div class=\"activity-feed\">",
            escape_html(&self.heading)
        );
        for item in &self.items {
            html.push_str(&item.to_html());
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
