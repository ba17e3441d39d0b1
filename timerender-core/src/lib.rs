//! # timerender-core
//!
//! Relative timestamp rendering for live user interfaces.
//!
//! This library provides:
//! - Day labels ("Today", "Yesterday", "Mar 3", "Mar 3, 2019") and
//!   "last seen" tiers ("5 minutes ago", "3 days ago")
//! - Absolute renderings honoring a 24-hour clock preference, with
//!   timezone name and UTC offset
//! - A registry of on-screen labels that go stale at midnight, and a
//!   scheduler that refreshes them when the local day changes
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Rendering and refreshing share one stateful component:
//! - **Render:** [`Renderer::render_date`] classifies an instant, hands a
//!   [`DateSpan`] to the host, and registers it if its label is relative
//! - **Refresh:** the [`Scheduler`] ticks every minute; when the local date
//!   has changed, each tracked span is re-classified and re-rendered through
//!   the [`HostUi`], or dropped if the host no longer shows it
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timerender_core::{Catalog, Renderer, SpanTable, SystemClock};
//!
//! let mut renderer = Renderer::new(Arc::new(SystemClock), Arc::new(Catalog::english()));
//! renderer.initialize();
//!
//! let mut host = SpanTable::new();
//! host.insert(renderer.render_date(chrono::Utc::now(), None));
//!
//! // Normally driven by Scheduler::start once a minute
//! renderer.tick(&mut host);
//! ```

// Re-export commonly used items at the crate root
pub use classify::{calendar_day_difference, render_now, ClassificationResult};
pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use host::{DateContent, DateSpan, HostUi, SpanTable};
pub use i18n::{Catalog, Message, Translator};
pub use last_seen::last_seen_status;
pub use prefs::Preferences;
pub use registry::{DisplayEntry, EntryId, Registry};
pub use render::{RefreshStats, Renderer, TickOutcome};
pub use scheduler::{Scheduler, SchedulerHandle, SharedRenderer};
pub use timezone::{tz_with_utc_offset, AbbreviationTable, GenericZoneNames, ZoneNames};

// Public modules
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod i18n;
pub mod last_seen;
pub mod logging;
pub mod prefs;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod timezone;
