//! Refresh registry
//!
//! Holds the date spans whose labels depend on the current day. Entries are
//! never edited in place: a refresh pass takes the whole list and registers
//! fresh entries for the spans that still need tracking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Identifier tagging a rendered span so the host can find it again.
///
/// Minted from a monotonically increasing counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timerender{}", self.0)
    }
}

/// Source of fresh [`EntryId`]s.
#[derive(Debug, Default)]
pub struct EntryIds {
    next: u64,
}

impl EntryIds {
    pub fn mint(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }

    /// Restart numbering from zero. Only safe once no span from the previous
    /// numbering is still displayed.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// A tracked, time-sensitive span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub id: EntryId,
    /// The date shown (the lower one for a pair)
    pub primary: DateTime<Utc>,
    /// The upper date of a pair
    pub secondary: Option<DateTime<Utc>>,
    pub needs_update: bool,
}

/// Ordered collection of live entries.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<DisplayEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an entry. Entries that do not need updates are ignored.
    ///
    /// Returns whether the entry was added.
    pub fn register(&mut self, entry: DisplayEntry) -> bool {
        if !entry.needs_update {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Take every entry, leaving the registry empty.
    pub fn take_all(&mut self) -> Vec<DisplayEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: u64, needs_update: bool) -> DisplayEntry {
        DisplayEntry {
            id: EntryId::new(id),
            primary: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            secondary: None,
            needs_update,
        }
    }

    #[test]
    fn test_stable_entries_are_not_registered() {
        let mut registry = Registry::new();
        assert!(!registry.register(entry(0, false)));
        assert!(registry.is_empty());

        assert!(registry.register(entry(1, true)));
        assert!(registry.contains(EntryId::new(1)));
        assert!(!registry.contains(EntryId::new(0)));
    }

    #[test]
    fn test_take_all_preserves_order_and_empties() {
        let mut registry = Registry::new();
        for id in [3, 1, 2] {
            registry.register(entry(id, true));
        }

        let taken: Vec<u64> = registry.take_all().iter().map(|e| e.id.value()).collect();
        assert_eq!(taken, vec![3, 1, 2]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = EntryIds::default();
        let first = ids.mint();
        let second = ids.mint();
        assert!(second > first);
        assert_eq!(first.to_string(), "timerender0");
        assert_eq!(second.to_string(), "timerender1");

        ids.reset();
        assert_eq!(ids.mint(), first);
    }
}
