//! Clock source
//!
//! Every classification needs two things from the platform: the current
//! instant and the viewer's UTC offset at a given instant. Both come from a
//! [`Clock`] so tests can pin time and zone without touching the host.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::sync::Mutex;

/// Supplies "now" and the viewer's timezone.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the viewer's UTC offset in effect at `instant`.
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset;

    /// Converts an instant into the viewer's local time.
    fn local(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }

    /// Current time in the viewer's zone. Reads the clock once.
    fn local_now(&self) -> DateTime<FixedOffset> {
        self.local(&self.now())
    }

    /// The viewer's current calendar date (local midnight).
    fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }
}

/// Wall clock in the machine's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

/// Wall clock viewed from a fixed UTC offset, regardless of machine settings.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        self.offset
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            current: Mutex::new(start),
            offset,
        }
    }

    /// A clock pinned to `start` that views time from UTC.
    pub fn utc(start: DateTime<Utc>) -> Self {
        Self::new(start, Utc.fix())
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut current = self.lock();
        *current += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }

    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        self.offset
    }
}
