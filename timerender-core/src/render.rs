//! Date span rendering and day-boundary refresh
//!
//! ```text
//!   render_date ──► render_now ──► DateSpan ──► host inserts element
//!        │
//!        └── needs update? ──► Registry
//!                                 │
//!   tick (every minute) ──────────┘
//!     same local day as last pass? ── yes ──► nothing
//!     no ──► take all entries ──► resolve ids via host
//!              none live ──► drop entry
//!              live ──► render_now again ──► host.render ──► re-register if still relative
//! ```

use crate::classify::{render_now, ClassificationResult};
use crate::clock::Clock;
use crate::host::{DateContent, DateSpan, HostUi};
use crate::i18n::Translator;
use crate::registry::{DisplayEntry, EntryIds, Registry};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;

/// Result of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The local day has not changed since the last pass
    Skipped,
    /// The day changed and every tracked entry was re-evaluated
    Refreshed(RefreshStats),
}

/// Counters for a refresh pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    /// Entries taken from the registry
    pub processed: usize,
    /// Element renders performed
    pub rerendered: usize,
    /// Entries dropped because no element carries their id anymore
    pub pruned: usize,
    /// Entries registered again because their label is still relative
    pub retained: usize,
}

/// Renders date spans and keeps the relative ones current.
pub struct Renderer {
    clock: Arc<dyn Clock>,
    translator: Arc<dyn Translator>,
    registry: Registry,
    ids: EntryIds,
    /// Local date of the last refresh pass
    boundary: Option<NaiveDate>,
}

impl Renderer {
    pub fn new(clock: Arc<dyn Clock>, translator: Arc<dyn Translator>) -> Self {
        Self {
            clock,
            translator,
            registry: Registry::new(),
            ids: EntryIds::default(),
            boundary: None,
        }
    }

    /// Seed the refresh boundary with today's date, so the first tick only
    /// does work once the day actually changes.
    pub fn initialize(&mut self) {
        self.boundary = Some(self.clock.today());
    }

    /// Classify an instant against the current time.
    pub fn classify(&self, time: &DateTime<Utc>) -> ClassificationResult {
        let today = self.clock.local_now();
        render_now(&self.clock.local(time), &today, self.translator.as_ref())
    }

    /// Render a date span for `time`, optionally paired with `time_above`
    /// for a divider like `▲ Yesterday ▲ ─── ▼ Today ▼`.
    pub fn render_date(
        &mut self,
        time: DateTime<Utc>,
        time_above: Option<DateTime<Utc>>,
    ) -> DateSpan {
        let today = self.clock.now();
        self.render_date_as_of(time, time_above, today)
    }

    /// Like [`render_date`](Self::render_date) with an explicit "today".
    pub fn render_date_as_of(
        &mut self,
        time: DateTime<Utc>,
        time_above: Option<DateTime<Utc>>,
        today: DateTime<Utc>,
    ) -> DateSpan {
        let id = self.ids.mint();
        let today = self.clock.local(&today);
        let (content, needs_update) = self.date_content(time, time_above, &today);

        self.registry.register(DisplayEntry {
            id,
            primary: time,
            secondary: time_above,
            needs_update,
        });

        DateSpan { id, content }
    }

    /// Classify one or both sides of a span. A pair is tracked as a unit,
    /// so it needs updates if either side does.
    fn date_content(
        &self,
        time: DateTime<Utc>,
        time_above: Option<DateTime<Utc>>,
        today: &DateTime<FixedOffset>,
    ) -> (DateContent, bool) {
        let translator = self.translator.as_ref();
        let below = render_now(&self.clock.local(&time), today, translator);

        match time_above {
            Some(time_above) => {
                let above = render_now(&self.clock.local(&time_above), today, translator);
                let needs_update = below.needs_update || above.needs_update;
                let content = DateContent::Pair {
                    above: above.label,
                    below: below.label,
                };
                (content, needs_update)
            }
            None => {
                let content = DateContent::Single {
                    label: below.label,
                    formal_label: below.formal_label,
                };
                (content, below.needs_update)
            }
        }
    }

    /// Re-render tracked spans if the local day changed since the last pass.
    pub fn tick<H: HostUi>(&mut self, host: &mut H) -> TickOutcome {
        let now = self.clock.local_now();
        let today = now.date_naive();
        if self.boundary == Some(today) {
            return TickOutcome::Skipped;
        }

        let to_process = self.registry.take_all();
        self.boundary = Some(today);

        let mut stats = RefreshStats {
            processed: to_process.len(),
            ..Default::default()
        };

        for entry in to_process {
            let elements = host.resolve(entry.id);
            if elements.is_empty() {
                tracing::trace!(id = %entry.id, "Dropping date span with no live element");
                stats.pruned += 1;
                continue;
            }

            let (content, needs_update) = self.date_content(entry.primary, entry.secondary, &now);
            for element in &elements {
                host.render(element, &content);
            }
            stats.rerendered += elements.len();

            if self.registry.register(DisplayEntry {
                needs_update,
                ..entry
            }) {
                stats.retained += 1;
            }
        }

        tracing::debug!(
            day = %today,
            processed = stats.processed,
            rerendered = stats.rerendered,
            pruned = stats.pruned,
            retained = stats.retained,
            "Refreshed date spans for new day"
        );

        TickOutcome::Refreshed(stats)
    }

    /// Forget all tracked spans, restart id numbering, and reseed the
    /// boundary to today.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.ids.reset();
        self.initialize();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Local date of the last refresh pass, if any.
    pub fn boundary(&self) -> Option<NaiveDate> {
        self.boundary
    }
}
