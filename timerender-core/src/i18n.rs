//! Translation provider
//!
//! The core never builds user-visible sentences itself. It hands a
//! [`Message`] (a default English template plus interpolation arguments) to
//! a [`Translator`], which owns the locale.
//!
//! [`Catalog`] is the built-in translator: English defaults, optionally
//! overridden per template from a TOML table such as
//!
//! ```toml
//! "Today" = "Heute"
//! "{minutes} minutes ago" = "vor {minutes} Minuten"
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Every message the engine can ask to have translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Today,
    Yesterday,
    JustNow,
    MinutesAgo { minutes: i64 },
    AnHourAgo,
    HoursAgo { hours: i64 },
    DaysAgo { days_old: i64 },
    DateAtTime { date: String, time: String },
    /// Pre-formatted month/day for a last-seen date in the current year
    LastActiveDate { date: String },
    /// Pre-formatted month/day/year for an older last-seen date
    LastActiveDateWithYear { date: String },
}

impl Message {
    /// The English template, which doubles as the catalog key.
    pub fn default_message(&self) -> &'static str {
        match self {
            Message::Today => "Today",
            Message::Yesterday => "Yesterday",
            Message::JustNow => "Just now",
            Message::MinutesAgo { .. } => "{minutes} minutes ago",
            Message::AnHourAgo => "An hour ago",
            Message::HoursAgo { .. } => "{hours} hours ago",
            Message::DaysAgo { .. } => "{days_old} days ago",
            Message::DateAtTime { .. } => "{date} at {time}",
            Message::LastActiveDate { .. } | Message::LastActiveDateWithYear { .. } => {
                "{last_active_date}"
            }
        }
    }

    /// Interpolation arguments as `(name, value)` pairs.
    pub fn args(&self) -> Vec<(&'static str, String)> {
        match self {
            Message::MinutesAgo { minutes } => vec![("minutes", minutes.to_string())],
            Message::HoursAgo { hours } => vec![("hours", hours.to_string())],
            Message::DaysAgo { days_old } => vec![("days_old", days_old.to_string())],
            Message::DateAtTime { date, time } => {
                vec![("date", date.clone()), ("time", time.clone())]
            }
            Message::LastActiveDate { date } | Message::LastActiveDateWithYear { date } => {
                vec![("last_active_date", date.clone())]
            }
            Message::Today
            | Message::Yesterday
            | Message::JustNow
            | Message::AnHourAgo => Vec::new(),
        }
    }
}

/// Maps a message to a localized string.
pub trait Translator: Send + Sync {
    fn translate(&self, message: &Message) -> String;
}

/// Template catalog keyed by the English default message.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: HashMap<String, String>,
}

impl Catalog {
    /// English catalog with no overrides.
    pub fn english() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Load overrides from a TOML file of `"template" = "translation"` pairs.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!("failed to read catalog {:?}: {}", path, e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let overrides: HashMap<String, String> = toml::from_str(content)
            .map_err(|e| Error::Catalog(format!("failed to parse catalog: {}", e)))?;
        Ok(Self::with_overrides(overrides))
    }

    /// Add overrides, replacing existing templates for the same key.
    pub fn extend(&mut self, overrides: HashMap<String, String>) {
        self.overrides.extend(overrides);
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, message: &Message) -> String {
        let default = message.default_message();
        let template = self
            .overrides
            .get(default)
            .map(String::as_str)
            .unwrap_or(default);
        interpolate(template, &message.args())
    }
}

/// Replace `{name}` placeholders. Unknown placeholders are left as written.
fn interpolate(template: &str, args: &[(&'static str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
