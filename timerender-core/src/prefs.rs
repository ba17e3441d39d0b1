//! Viewer preferences consulted by the absolute formatters.

use crate::config::DisplayConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of the 24-hour clock preference.
///
/// Formatters call this on every invocation, so a setting toggled at
/// runtime takes effect on the next render.
pub trait Preferences: Send + Sync {
    fn twenty_four_hour_time(&self) -> bool;
}

impl Preferences for bool {
    fn twenty_four_hour_time(&self) -> bool {
        *self
    }
}

impl Preferences for AtomicBool {
    fn twenty_four_hour_time(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Preferences for DisplayConfig {
    fn twenty_four_hour_time(&self) -> bool {
        self.twenty_four_hour_time
    }
}

impl<T: Preferences + ?Sized> Preferences for Arc<T> {
    fn twenty_four_hour_time(&self) -> bool {
        (**self).twenty_four_hour_time()
    }
}
