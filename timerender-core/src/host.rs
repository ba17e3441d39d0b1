//! Host UI capability
//!
//! The engine never touches UI elements directly. It asks the host to
//! resolve an [`EntryId`] to whatever live elements carry it and to render
//! [`DateContent`] into them. [`SpanTable`] is a plain in-memory host used
//! by the CLI and tests.

use crate::registry::EntryId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What a date span displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateContent {
    /// One date, with its formal label for the tooltip
    Single { label: String, formal_label: String },
    /// Two dates around a divider: `▲ above ▲ ─── ▼ below ▼`
    Pair { above: String, below: String },
}

impl DateContent {
    /// The visible label text (the lower date for a pair).
    pub fn label(&self) -> &str {
        match self {
            DateContent::Single { label, .. } => label,
            DateContent::Pair { below, .. } => below,
        }
    }

    /// Tooltip text, only present on single dates.
    pub fn tooltip(&self) -> Option<&str> {
        match self {
            DateContent::Single { formal_label, .. } => Some(formal_label),
            DateContent::Pair { .. } => None,
        }
    }
}

impl fmt::Display for DateContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateContent::Single { label, .. } => write!(f, "{}", label),
            DateContent::Pair { above, below } => write!(f, "▲ {} ▲ ─── ▼ {} ▼", above, below),
        }
    }
}

/// A freshly rendered span, ready to be inserted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub id: EntryId,
    pub content: DateContent,
}

/// The UI collaborator that owns the elements displaying dates.
pub trait HostUi {
    type Element;

    /// All live elements tagged with `id`. Stale ids resolve to nothing.
    fn resolve(&self, id: EntryId) -> Vec<Self::Element>;

    /// Replace an element's content.
    fn render(&mut self, element: &Self::Element, content: &DateContent);
}

/// In-memory host: each id maps to one or more element copies.
///
/// Copies model the same span spliced into several places, which is why
/// resolving returns a list.
#[derive(Debug, Default, Clone)]
pub struct SpanTable {
    spans: BTreeMap<EntryId, Vec<DateContent>>,
    renders: usize,
}

/// Handle to one element copy inside a [`SpanTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanElement {
    pub id: EntryId,
    pub index: usize,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rendered span as a new element.
    pub fn insert(&mut self, span: DateSpan) {
        self.spans.entry(span.id).or_default().push(span.content);
    }

    /// Remove every element tagged with `id`. Returns how many were removed.
    pub fn remove(&mut self, id: EntryId) -> usize {
        self.spans.remove(&id).map(|copies| copies.len()).unwrap_or(0)
    }

    /// Content of the first element tagged with `id`.
    pub fn content(&self, id: EntryId) -> Option<&DateContent> {
        self.spans.get(&id).and_then(|copies| copies.first())
    }

    pub fn copies(&self, id: EntryId) -> &[DateContent] {
        self.spans.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &DateContent)> {
        self.spans
            .iter()
            .filter_map(|(id, copies)| copies.first().map(|content| (*id, content)))
    }

    /// Total number of element renders performed by refresh passes.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl HostUi for SpanTable {
    type Element = SpanElement;

    fn resolve(&self, id: EntryId) -> Vec<SpanElement> {
        (0..self.copies(id).len())
            .map(|index| SpanElement { id, index })
            .collect()
    }

    fn render(&mut self, element: &SpanElement, content: &DateContent) {
        if let Some(slot) = self
            .spans
            .get_mut(&element.id)
            .and_then(|copies| copies.get_mut(element.index))
        {
            *slot = content.clone();
            self.renders += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(label: &str) -> DateContent {
        DateContent::Single {
            label: label.to_string(),
            formal_label: format!("formal {}", label),
        }
    }

    #[test]
    fn test_resolve_returns_every_copy() {
        let mut table = SpanTable::new();
        let id = EntryId::new(7);
        table.insert(DateSpan { id, content: single("Today") });
        table.insert(DateSpan { id, content: single("Today") });

        let elements = table.resolve(id);
        assert_eq!(elements.len(), 2);

        table.render(&elements[1], &single("Yesterday"));
        assert_eq!(table.copies(id)[0].label(), "Today");
        assert_eq!(table.copies(id)[1].label(), "Yesterday");
        assert_eq!(table.render_count(), 1);
    }

    #[test]
    fn test_stale_id_resolves_to_nothing() {
        let mut table = SpanTable::new();
        let id = EntryId::new(1);
        table.insert(DateSpan { id, content: single("Today") });
        assert_eq!(table.remove(id), 1);

        assert!(table.resolve(id).is_empty());
        assert!(table.resolve(EntryId::new(99)).is_empty());
    }

    #[test]
    fn test_pair_display() {
        let pair = DateContent::Pair {
            above: "Yesterday".to_string(),
            below: "Today".to_string(),
        };
        assert_eq!(pair.to_string(), "▲ Yesterday ▲ ─── ▼ Today ▼");
        assert_eq!(pair.label(), "Today");
        assert!(pair.tooltip().is_none());
        assert_eq!(single("Mar 3").tooltip(), Some("formal Mar 3"));
    }
}
