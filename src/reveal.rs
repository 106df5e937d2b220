// Scroll reveal.
// Marks observed elements visible the first time they cross the intersection threshold.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Class that opts an element into scroll reveal.
pub const REVEAL_CLASS: &str = "reveal";
/// Class added once an element has been revealed.
pub const VISIBLE_CLASS: &str = "is-visible";
/// Fraction of an element that must be in view to reveal it.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Identifier of an element in the document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId(id.to_string())
    }
}

/// Document capabilities the reveal watcher needs.
pub trait RevealTarget {
    /// All elements tagged for reveal.
    fn reveal_elements(&self) -> Vec<ElementId>;
    fn add_class(&mut self, element: &ElementId, class: &str);
}

/// One visibility change reported by the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element, 0.0 to 1.0.
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: impl Into<ElementId>, ratio: f64) -> Self {
        Self {
            target: target.into(),
            is_intersecting: ratio > 0.0,
            ratio,
        }
    }
}

/// Intersection watcher for reveal-tagged elements.
///
/// Observed elements stay observed for the watcher's lifetime; reveal is
/// one-way.
#[derive(Debug)]
pub struct ScrollReveal {
    threshold: f64,
    observed: BTreeSet<ElementId>,
}

impl Default for ScrollReveal {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            observed: BTreeSet::new(),
        }
    }
}

impl ScrollReveal {
    /// Register every reveal-tagged element of `target`.
    pub fn setup(target: &impl RevealTarget) -> Self {
        let mut reveal = Self::default();
        for element in target.reveal_elements() {
            reveal.observe(element);
        }
        tracing::debug!(count = reveal.observed.len(), "Scroll reveal observing elements");
        reveal
    }

    pub fn observe(&mut self, element: ElementId) {
        self.observed.insert(element);
    }

    pub fn is_observing(&self, element: &ElementId) -> bool {
        self.observed.contains(element)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Process a batch of intersection changes, returning how many elements
    /// crossed into view.
    pub fn handle(&self, entries: &[IntersectionEntry], target: &mut impl RevealTarget) -> usize {
        let mut revealed = 0;
        for entry in entries {
            if !self.is_observing(&entry.target) {
                continue;
            }
            if entry.is_intersecting && entry.ratio >= self.threshold {
                target.add_class(&entry.target, VISIBLE_CLASS);
                revealed += 1;
            }
        }
        revealed
    }
}
