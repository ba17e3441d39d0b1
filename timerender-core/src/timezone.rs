//! Timezone name and UTC offset display
//!
//! Produces strings like `"IST (UTC+05:30)"`, `"UTC"` or `"(UTC-04:00)"` for
//! tooltips and full date-time renderings.

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// Resolves the short timezone name the viewer's locale uses at an instant.
pub trait ZoneNames: Send + Sync {
    fn short_name(&self, local: &DateTime<FixedOffset>) -> String;
}

/// Names every zone by its offset, the way a locale with no name for the
/// zone does: `"UTC"` at zero, otherwise `"GMT+5:30"` / `"GMT-4"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericZoneNames;

impl ZoneNames for GenericZoneNames {
    fn short_name(&self, local: &DateTime<FixedOffset>) -> String {
        let seconds = local.offset().local_minus_utc();
        if seconds == 0 {
            return "UTC".to_string();
        }

        let sign = if seconds < 0 { '-' } else { '+' };
        let minutes = seconds.abs() / 60;
        let (hours, minutes) = (minutes / 60, minutes % 60);
        if minutes == 0 {
            format!("GMT{}{}", sign, hours)
        } else {
            format!("GMT{}{}:{:02}", sign, hours, minutes)
        }
    }
}

/// Abbreviations keyed by `±HH:MM` offset, e.g. `"+05:30" => "IST"`.
///
/// Offsets missing from the table fall back to [`GenericZoneNames`].
#[derive(Debug, Default, Clone)]
pub struct AbbreviationTable {
    names: HashMap<String, String>,
}

impl AbbreviationTable {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }
}

impl ZoneNames for AbbreviationTable {
    fn short_name(&self, local: &DateTime<FixedOffset>) -> String {
        self.names
            .get(&utc_offset(local))
            .cloned()
            .unwrap_or_else(|| GenericZoneNames.short_name(local))
    }
}

/// The instant's offset as `±HH:MM`.
pub fn utc_offset(local: &DateTime<FixedOffset>) -> String {
    local.format("%:z").to_string()
}

/// True for names like `"GMT+5:30"` that only restate the offset.
///
/// Locales report these when they disagree with the machine's timezone
/// (e.g. en_US viewing IST).
fn is_generic_gmt(name: &str) -> bool {
    name.match_indices("GMT")
        .any(|(i, _)| name[i + 3..].starts_with(|c: char| c == '+' || c == '-'))
}

/// Combine the zone's short name with its UTC offset.
pub fn tz_with_utc_offset(local: &DateTime<FixedOffset>, names: &dyn ZoneNames) -> String {
    let name = names.short_name(local);
    if name == "UTC" {
        return "UTC".to_string();
    }

    let tz_utc_offset = format!("(UTC{})", utc_offset(local));
    if name.is_empty() || is_generic_gmt(&name) {
        return tz_utc_offset;
    }
    format!("{} {}", name, tz_utc_offset)
}
