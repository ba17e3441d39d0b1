//! Coarse "last seen" labels for presence indicators.

use crate::classify::{calendar_day_difference, SHORT_DATE, SHORT_DATE_WITH_YEAR};
use crate::i18n::{Message, Translator};
use chrono::{DateTime, Datelike, FixedOffset};

/// Describe how long ago `last_active` was, as seen at `now`.
///
/// Both instants must be in the viewer's zone. The tier boundaries are
/// intentionally asymmetric: exactly 90 days old skips the "days ago" tier
/// and renders a dated label with the year.
pub fn last_seen_status(
    last_active: &DateTime<FixedOffset>,
    now: &DateTime<FixedOffset>,
    translator: &dyn Translator,
) -> String {
    let minutes = now.signed_duration_since(*last_active).num_minutes();
    if minutes <= 2 {
        return translator.translate(&Message::JustNow);
    }
    if minutes < 60 {
        return translator.translate(&Message::MinutesAgo { minutes });
    }

    let days_old = calendar_day_difference(now, last_active);
    let hours = minutes / 60;

    if hours < 24 {
        if hours == 1 {
            return translator.translate(&Message::AnHourAgo);
        }
        return translator.translate(&Message::HoursAgo { hours });
    }

    if days_old == 1 {
        return translator.translate(&Message::Yesterday);
    }

    if days_old < 90 {
        translator.translate(&Message::DaysAgo { days_old })
    } else if days_old > 90 && days_old < 365 && last_active.year() == now.year() {
        translator.translate(&Message::LastActiveDate {
            date: last_active.format(SHORT_DATE).to_string(),
        })
    } else {
        translator.translate(&Message::LastActiveDateWithYear {
            date: last_active.format(SHORT_DATE_WITH_YEAR).to_string(),
        })
    }
}
