//! timerender - render timestamps the way a chat UI shows them
//!
//! Subcommands print day labels, "last seen" labels and absolute renderings
//! for a timestamp, and `watch` keeps a list of rendered dates current
//! across midnight using the refresh scheduler.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/timerender/timerender.log (~/.local/state/timerender/timerender.log)
//! - Config: $XDG_CONFIG_HOME/timerender/config.toml (~/.config/timerender/config.toml)

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use timerender_core::format::{
    absolute_time, full_datetime, full_time, parse_timestamp, render_markdown_timestamp,
    stringify_time, timestamp_for_picker,
};
use timerender_core::scheduler::lock;
use timerender_core::{
    last_seen_status, render_now, Catalog, Clock, Config, OffsetClock, Renderer, Scheduler,
    SpanTable, SystemClock,
};

#[derive(Parser)]
#[command(name = "timerender")]
#[command(about = "Human-friendly, timezone-aware timestamp labels")]
#[command(version)]
struct Args {
    /// View times from this UTC offset (e.g. +05:30) instead of the local zone
    #[arg(long, global = true, value_parser = parse_offset, allow_hyphen_values = true)]
    utc_offset: Option<FixedOffset>,

    /// Use a 24-hour clock regardless of configuration
    #[arg(long = "24h", global = true)]
    twenty_four_hour: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Day label for a timestamp ("Today", "Yesterday", "Mar 3")
    Classify {
        time: String,
        /// Reference time (default: now)
        #[arg(long)]
        today: Option<String>,
    },
    /// Presence label ("Just now", "5 minutes ago", ...)
    LastSeen {
        time: String,
        /// Reference time (default: now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Every absolute rendering of a timestamp
    Format {
        time: String,
        /// Reference time for the year rule (default: now)
        #[arg(long)]
        today: Option<String>,
    },
    /// Unix seconds as a UTC ISO 8601 string
    Iso {
        #[arg(allow_hyphen_values = true)]
        seconds: i64,
    },
    /// Parse date picker input, falling back to now
    Parse { input: String },
    /// Render dates and keep them current until interrupted
    Watch {
        /// Timestamps to render (default: now)
        times: Vec<String>,
        /// Render consecutive timestamps as above/below pairs
        #[arg(long)]
        pairs: bool,
        /// Seconds between day-change checks (default: from config)
        #[arg(long)]
        interval: Option<u64>,
        /// Mirror log events to stderr
        #[arg(long, short)]
        verbose: bool,
    },
}

fn parse_offset(s: &str) -> std::result::Result<FixedOffset, String> {
    s.parse::<FixedOffset>()
        .map_err(|e| format!("invalid UTC offset {:?}: {}", s, e))
}

#[derive(Serialize)]
struct FormatOutput {
    markdown: String,
    tooltip: String,
    time: String,
    absolute: String,
    full: String,
    iso: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    if let Command::Watch { verbose: true, .. } = args.command {
        config.logging.console = true;
    }
    let _log_guard = timerender_core::logging::init(&config.logging).ok();

    let clock: Arc<dyn Clock> = match args.utc_offset {
        Some(offset) => Arc::new(OffsetClock::new(offset)),
        None => Arc::new(SystemClock),
    };
    let catalog = Arc::new(config.catalog().context("failed to load message catalog")?);
    let zone_names = config.zone_names();
    let twenty_four_hour = args.twenty_four_hour || config.display.twenty_four_hour_time;

    let clock_ref = clock.as_ref();

    match &args.command {
        Command::Classify { time, today } => {
            let time = clock.local(&read_time(time, clock_ref)?);
            let today = reference(today.as_deref(), clock_ref)?;
            let result = render_now(&time, &today, catalog.as_ref());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.label);
                println!("{}", result.formal_label.replace('\u{a0}', " "));
                println!("needs update: {}", result.needs_update);
            }
        }
        Command::LastSeen { time, now } => {
            let time = clock.local(&read_time(time, clock_ref)?);
            let now = reference(now.as_deref(), clock_ref)?;
            let label = last_seen_status(&time, &now, catalog.as_ref());
            print_value(args.json, &label)?;
        }
        Command::Format { time, today } => {
            let time = clock.local(&read_time(time, clock_ref)?);
            let today = reference(today.as_deref(), clock_ref)?;
            let markdown = render_markdown_timestamp(&time, &twenty_four_hour, &zone_names);
            let output = FormatOutput {
                markdown: markdown.text,
                tooltip: markdown.tooltip.tz_offset_str,
                time: stringify_time(&time, &twenty_four_hour),
                absolute: absolute_time(&time, &today, &twenty_four_hour),
                full: full_datetime(&time, &twenty_four_hour, &zone_names, catalog.as_ref()),
                iso: full_time(time.timestamp()),
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("markdown: {}", output.markdown);
                println!("tooltip:  {}", output.tooltip);
                println!("time:     {}", output.time);
                println!("absolute: {}", output.absolute);
                println!("full:     {}", output.full);
                println!("iso:      {}", output.iso.as_deref().unwrap_or("-"));
            }
        }
        Command::Iso { seconds } => {
            let iso = full_time(*seconds)
                .with_context(|| format!("timestamp {} is out of range", seconds))?;
            print_value(args.json, &iso)?;
        }
        Command::Parse { input } => {
            let parsed = timestamp_for_picker(input, clock_ref);
            print_value(args.json, &parsed.to_rfc3339())?;
        }
        Command::Watch {
            times,
            pairs,
            interval,
            ..
        } => {
            let times = times
                .iter()
                .map(|input| read_time(input, clock_ref))
                .collect::<Result<Vec<_>>>()?;
            let period = match interval {
                Some(secs) if *secs > 0 => Duration::from_secs(*secs),
                Some(_) => anyhow::bail!("--interval must be greater than 0"),
                None => config.refresh.interval(),
            };
            watch(clock.clone(), catalog, &times, *pairs, period).await?;
        }
    }

    Ok(())
}

fn read_time(input: &str, clock: &dyn Clock) -> Result<DateTime<Utc>> {
    parse_timestamp(input, clock).with_context(|| format!("bad timestamp {:?}", input))
}

/// The reference "now" for a command, in the viewer's zone.
fn reference(input: Option<&str>, clock: &dyn Clock) -> Result<DateTime<FixedOffset>> {
    match input {
        Some(input) => Ok(clock.local(&read_time(input, clock)?)),
        None => Ok(clock.local_now()),
    }
}

fn print_value(json: bool, value: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

async fn watch(
    clock: Arc<dyn Clock>,
    catalog: Arc<Catalog>,
    times: &[DateTime<Utc>],
    pairs: bool,
    period: Duration,
) -> Result<()> {
    let mut renderer = Renderer::new(clock.clone(), catalog);
    renderer.initialize();
    let renderer = Arc::new(Mutex::new(renderer));
    let host = Arc::new(Mutex::new(SpanTable::new()));

    let times = if times.is_empty() {
        vec![clock.now()]
    } else {
        times.to_vec()
    };

    {
        let mut renderer = lock(&renderer);
        let mut host = lock(&host);
        if pairs {
            for chunk in times.chunks(2) {
                let above = chunk.get(1).copied();
                host.insert(renderer.render_date(chunk[0], above));
            }
        } else {
            for time in &times {
                host.insert(renderer.render_date(*time, None));
            }
        }
        tracing::info!(
            spans = host.len(),
            tracked = renderer.registry().len(),
            "Rendered date spans"
        );
    }

    print_spans(&lock(&host), clock.as_ref());

    let handle = Scheduler::new(renderer.clone(), host.clone())
        .with_period(period)
        .start();

    let mut poll = tokio::time::interval(Duration::from_secs(1));
    let mut seen_renders = 0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = poll.tick() => {
                let host = lock(&host);
                if host.render_count() != seen_renders {
                    seen_renders = host.render_count();
                    print_spans(&host, clock.as_ref());
                }
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn print_spans(host: &SpanTable, clock: &dyn Clock) {
    println!("[{}]", clock.local_now().format("%H:%M:%S"));
    for (id, content) in host.iter() {
        println!("  {:<14} {}", id.to_string(), content);
    }
}
