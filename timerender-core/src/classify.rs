//! Time classifier
//!
//! Turns an instant into the relative day label shown next to messages
//! ("Today", "Yesterday", "Mar 3", "Mar 3, 2019") and reports whether that
//! label will go stale when the local day changes.

use crate::i18n::{Message, Translator};
use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use serde::Serialize;

/// Month and day, used for dates in the current year.
pub const SHORT_DATE: &str = "%b %-d";
/// Month, day and year, used for dates in other years.
pub const SHORT_DATE_WITH_YEAR: &str = "%b %-d, %Y";
/// Spelled-out weekday and date, separated by U+00A0 NO-BREAK SPACE so
/// tooltips never wrap mid-date.
pub const FORMAL_DATE: &str = "%A,\u{a0}%B\u{a0}%-d,\u{a0}%Y";

/// A rendered day label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Human-formatted label ("Today", "Mar 10", ...)
    pub label: String,
    /// Long form for tooltips ("Sunday, March 10, 2024")
    pub formal_label: String,
    /// True when the label depends on the current calendar day
    pub needs_update: bool,
}

/// Whole calendar days from `earlier` to `later`, ignoring time of day.
///
/// 0 means the same local date, 1 means `earlier` was the day before, and
/// negative values mean `earlier` is actually in the future.
pub fn calendar_day_difference<Tz: TimeZone>(later: &DateTime<Tz>, earlier: &DateTime<Tz>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

/// Classify `time` relative to `today`. Both must already be in the
/// viewer's zone.
///
/// Instants after `today` are not special-cased: they get a dated label
/// and are never flagged for refresh, so a future timestamp keeps its
/// dated label even once its day arrives.
pub fn render_now(
    time: &DateTime<FixedOffset>,
    today: &DateTime<FixedOffset>,
    translator: &dyn Translator,
) -> ClassificationResult {
    let formal_label = time.format(FORMAL_DATE).to_string();
    let days_old = calendar_day_difference(today, time);

    let (label, needs_update) = if days_old == 0 {
        (translator.translate(&Message::Today), true)
    } else if days_old == 1 {
        (translator.translate(&Message::Yesterday), true)
    } else if time.year() != today.year() {
        // Backlog from older years is ambiguous without the year
        (time.format(SHORT_DATE_WITH_YEAR).to_string(), false)
    } else {
        (time.format(SHORT_DATE).to_string(), false)
    };

    ClassificationResult {
        label,
        formal_label,
        needs_update,
    }
}
