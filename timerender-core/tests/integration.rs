//! Integration tests for the render/refresh lifecycle
//!
//! These tests drive a renderer, an in-memory host, and the scheduler with a
//! manually advanced clock to verify how date spans evolve across midnight.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use timerender_core::format::{absolute_time, full_time, parse_timestamp, render_markdown_timestamp};
use timerender_core::scheduler::lock;
use timerender_core::{
    Catalog, Clock, DateContent, FixedClock, GenericZoneNames, HostUi, Renderer, Scheduler,
    SpanTable, TickOutcome,
};

fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

/// Clock and renderer for a viewer in UTC+05:30, initialized at `start`
fn renderer_at(start: DateTime<Utc>) -> (Arc<FixedClock>, Renderer) {
    let clock = Arc::new(FixedClock::new(start, ist()));
    let mut renderer = Renderer::new(clock.clone(), Arc::new(Catalog::english()));
    renderer.initialize();
    (clock, renderer)
}

// ============================================
// Render and refresh
// ============================================

#[test]
fn test_message_list_over_three_days() {
    // 22:00 local on Mar 15 (16:30 UTC)
    let (clock, mut renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 16, 30, 0).unwrap());
    let mut host = SpanTable::new();

    let today = renderer.render_date(Utc.with_ymd_and_hms(2024, 3, 15, 4, 0, 0).unwrap(), None);
    let yesterday = renderer.render_date(Utc.with_ymd_and_hms(2024, 3, 14, 4, 0, 0).unwrap(), None);
    let old = renderer.render_date(Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).unwrap(), None);
    let ids = [today.id, yesterday.id, old.id];
    for span in [today, yesterday, old] {
        host.insert(span);
    }

    assert_eq!(renderer.registry().len(), 2);
    assert_eq!(host.content(ids[2]).unwrap().label(), "Feb 1");

    // Past local midnight
    clock.advance(Duration::hours(3));
    renderer.tick(&mut host);

    assert_eq!(host.content(ids[0]).unwrap().label(), "Yesterday");
    assert_eq!(host.content(ids[1]).unwrap().label(), "Mar 14");
    assert_eq!(host.content(ids[2]).unwrap().label(), "Feb 1");
    assert_eq!(renderer.registry().len(), 1);

    clock.advance(Duration::days(1));
    renderer.tick(&mut host);
    assert_eq!(host.content(ids[0]).unwrap().label(), "Mar 15");
    assert!(renderer.registry().is_empty());
}

#[test]
fn test_midnight_is_local_not_utc() {
    // 17:00 UTC is 22:30 local
    let (clock, mut renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 17, 0, 0).unwrap());
    let mut host = SpanTable::new();
    host.insert(renderer.render_date(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(), None));

    // 18:20 UTC is still Mar 15 UTC, but 23:50 locally
    clock.set(Utc.with_ymd_and_hms(2024, 3, 15, 18, 20, 0).unwrap());
    assert_eq!(renderer.tick(&mut host), TickOutcome::Skipped);

    // 18:40 UTC is 00:10 on Mar 16 locally
    clock.set(Utc.with_ymd_and_hms(2024, 3, 15, 18, 40, 0).unwrap());
    assert!(matches!(renderer.tick(&mut host), TickOutcome::Refreshed(_)));
}

#[test]
fn test_removed_span_pruned_after_one_day_change() {
    let (clock, mut renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap());
    let mut host = SpanTable::new();
    let span = renderer.render_date(Utc.with_ymd_and_hms(2024, 3, 15, 5, 0, 0).unwrap(), None);
    let id = span.id;
    host.insert(span);

    host.remove(id);
    clock.advance(Duration::hours(4));
    renderer.tick(&mut host);
    assert!(renderer.registry().contains(id), "same-day tick must not prune");

    clock.advance(Duration::days(1));
    renderer.tick(&mut host);
    assert!(!renderer.registry().contains(id));
    assert_eq!(host.render_count(), 0);
}

#[test]
fn test_pair_rerenders_as_unit() {
    let (clock, mut renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap());
    let mut host = SpanTable::new();
    let span = renderer.render_date(
        Utc.with_ymd_and_hms(2024, 3, 15, 5, 0, 0).unwrap(),
        Some(Utc.with_ymd_and_hms(2024, 3, 14, 5, 0, 0).unwrap()),
    );
    let id = span.id;
    host.insert(span.clone());
    host.insert(span);

    clock.advance(Duration::days(1));
    renderer.tick(&mut host);

    let expected = DateContent::Pair {
        above: "Mar 14".to_string(),
        below: "Yesterday".to_string(),
    };
    assert_eq!(host.copies(id), &[expected.clone(), expected]);
    assert_eq!(host.render_count(), 2);
    assert!(renderer.registry().contains(id));
}

#[test]
fn test_ids_never_reused_after_pruning() {
    let (clock, mut renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap());
    let mut host = SpanTable::new();
    let first = renderer.render_date(clock.now(), None);
    let first_id = first.id;
    host.insert(first);
    host.remove(first_id);

    clock.advance(Duration::days(1));
    renderer.tick(&mut host);

    let second = renderer.render_date(clock.now(), None);
    assert!(second.id > first_id);
    assert!(host.resolve(first_id).is_empty());
}

// ============================================
// Scheduler
// ============================================

#[tokio::test(start_paused = true)]
async fn test_scheduler_refreshes_after_midnight() {
    timerender_core::logging::init_test();
    let (clock, renderer) = renderer_at(Utc.with_ymd_and_hms(2024, 3, 15, 18, 28, 0).unwrap());
    let renderer = Arc::new(Mutex::new(renderer));
    let host = Arc::new(Mutex::new(SpanTable::new()));

    let span =
        lock(&renderer).render_date(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(), None);
    let id = span.id;
    lock(&host).insert(span);

    let handle = Scheduler::new(renderer.clone(), host.clone()).start();

    // First tick at 23:59 local: nothing to do
    tokio::time::sleep(std::time::Duration::from_secs(61)).await;
    assert_eq!(lock(&host).render_count(), 0);

    clock.advance(Duration::minutes(10));
    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    tokio::task::yield_now().await;

    assert_eq!(lock(&host).content(id).unwrap().label(), "Yesterday");
    assert_eq!(lock(&host).render_count(), 1);

    // Further ticks on the same day do nothing
    tokio::time::sleep(std::time::Duration::from_secs(300)).await;
    assert_eq!(lock(&host).render_count(), 1);

    handle.stop().await;
}

// ============================================
// Formatting
// ============================================

#[test]
fn test_absolute_renderings_follow_viewer_zone() {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(), ist());
    let time = clock.local(&Utc.with_ymd_and_hms(2023, 12, 31, 20, 0, 0).unwrap());

    // 20:00 UTC on Dec 31 is already Jan 1 in the viewer's zone
    assert_eq!(absolute_time(&time, &clock.local_now(), &true), "Jan 1 01:30");

    let markdown = render_markdown_timestamp(&time, &true, &GenericZoneNames);
    assert_eq!(markdown.text, "Mon, Jan 1 2024, 01:30");
    assert_eq!(markdown.tooltip.tz_offset_str, "(UTC+05:30)");
}

#[test]
fn test_iso_round_trip_through_viewer_zone() {
    let clock = FixedClock::new(Utc::now(), ist());
    for seconds in [0, 278_689_062, 1_710_515_045] {
        let iso = full_time(seconds).unwrap();
        assert!(iso.ends_with('Z'));
        assert_eq!(parse_timestamp(&iso, &clock).unwrap().timestamp(), seconds);
    }
}
