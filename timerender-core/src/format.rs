//! Absolute timestamp formatting
//!
//! Unlike the relative labels in [`crate::classify`], these renderings never
//! go stale and are not tracked for refresh. Every function that shows a
//! time of day reads the 24-hour preference at call time.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::i18n::{Message, Translator};
use crate::prefs::Preferences;
use crate::timezone::{tz_with_utc_offset, ZoneNames};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike,
    Utc,
};
use serde::Serialize;

const TIME_24H: &str = "%H:%M";
const TIME_12H: &str = "%-I:%M %p";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Payload for the tooltip shown over an inline `<time:...>` timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampTooltip {
    pub tz_offset_str: String,
}

/// An inline timestamp and its tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownTimestamp {
    pub text: String,
    pub tooltip: TimestampTooltip,
}

fn hour_format(prefs: &dyn Preferences) -> &'static str {
    if prefs.twenty_four_hour_time() {
        TIME_24H
    } else {
        TIME_12H
    }
}

/// Render a timestamp written inline in message content, e.g.
/// `"Fri, Mar 15 2024, 3:04 PM"`.
pub fn render_markdown_timestamp(
    local: &DateTime<FixedOffset>,
    prefs: &dyn Preferences,
    names: &dyn ZoneNames,
) -> MarkdownTimestamp {
    let pattern = format!("%a, %b %-d %Y, {}", hour_format(prefs));
    MarkdownTimestamp {
        text: local.format(&pattern).to_string(),
        tooltip: TimestampTooltip {
            tz_offset_str: tz_with_utc_offset(local, names),
        },
    }
}

/// Time of day only: `"15:04"` or `"3:04 PM"`.
pub fn stringify_time(local: &DateTime<FixedOffset>, prefs: &dyn Preferences) -> String {
    local.format(hour_format(prefs)).to_string()
}

/// Calendar stamp with time, e.g. `"Mar 15 03:04 PM"` or
/// `"Dec 25, 2023 14:30"`.
///
/// The year is included whenever it differs from `today`'s. The 12-hour
/// form keeps a zero-padded hour and only shifts hours past noon, so 12:xx
/// and 00:xx both render with an AM suffix.
pub fn absolute_time(
    local: &DateTime<FixedOffset>,
    today: &DateTime<FixedOffset>,
    prefs: &dyn Preferences,
) -> String {
    let mut out = format!("{} {}", local.format("%b"), local.day());
    if local.year() != today.year() {
        out.push_str(&format!(", {}", local.year()));
    }
    out.push(' ');
    out.push_str(&clock_time(local.hour(), local.minute(), prefs.twenty_four_hour_time()));
    out
}

fn clock_time(hours: u32, minutes: u32, twenty_four_hour: bool) -> String {
    if twenty_four_hour {
        return format!("{:02}:{:02}", hours, minutes);
    }
    let (hours, suffix) = if hours > 12 {
        (hours - 12, "PM")
    } else {
        (hours, "AM")
    };
    format!("{:02}:{:02} {}", hours, minutes, suffix)
}

/// Full sentence form, e.g. `"3/15/2024 at 3:04:05 PM IST (UTC+05:30)"`.
pub fn full_datetime(
    local: &DateTime<FixedOffset>,
    prefs: &dyn Preferences,
    names: &dyn ZoneNames,
    translator: &dyn Translator,
) -> String {
    let date = local.format("%-m/%-d/%Y").to_string();
    let time_format = if prefs.twenty_four_hour_time() {
        "%H:%M:%S"
    } else {
        "%-I:%M:%S %p"
    };
    let time = format!(
        "{} {}",
        local.format(time_format),
        tz_with_utc_offset(local, names)
    );
    translator.translate(&Message::DateAtTime { date, time })
}

/// Unix seconds as a UTC ISO 8601 string, e.g. `"1978-10-31T13:37:42Z"`.
///
/// Returns `None` for timestamps outside the representable range.
pub fn full_time(timestamp: i64) -> Option<String> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Parse user input for a date picker, falling back to the current time.
///
/// The picker always needs a valid instant, so parse failures are logged
/// and replaced by `clock.now()` instead of being returned.
pub fn timestamp_for_picker(input: &str, clock: &dyn Clock) -> DateTime<Utc> {
    match parse_timestamp(input, clock) {
        Ok(timestamp) => timestamp,
        Err(e) => {
            tracing::debug!(error = %e, "Falling back to current time");
            clock.now()
        }
    }
}

/// Parse an ISO 8601 timestamp. Inputs without an offset are read in the
/// viewer's zone; a bare date means local midnight.
pub fn parse_timestamp(input: &str, clock: &dyn Clock) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return naive_local_to_utc(naive, clock).ok_or_else(|| out_of_range(input));
        }
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => naive_local_to_utc(date.and_time(chrono::NaiveTime::MIN), clock)
            .ok_or_else(|| out_of_range(input)),
        Err(e) => Err(Error::InvalidTimestamp {
            input: input.to_string(),
            message: e.to_string(),
        }),
    }
}

fn out_of_range(input: &str) -> Error {
    Error::InvalidTimestamp {
        input: input.to_string(),
        message: "outside the representable range in the viewer's zone".to_string(),
    }
}

/// Resolve a wall-clock time in the viewer's zone. The offset is looked up
/// twice so a guess on the wrong side of a DST change corrects itself.
///
/// Returns `None` when shifting by the offset leaves chrono's range.
fn naive_local_to_utc(naive: NaiveDateTime, clock: &dyn Clock) -> Option<DateTime<Utc>> {
    let guess = naive.and_utc();
    let shift = |offset: FixedOffset| {
        guess.checked_sub_signed(chrono::Duration::seconds(offset.local_minus_utc() as i64))
    };
    let first = shift(clock.offset_at(&guess))?;
    shift(clock.offset_at(&first))
}
