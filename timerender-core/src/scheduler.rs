//! Periodic refresh timer
//!
//! The [`Scheduler`] wakes up on a fixed interval (one minute by default)
//! and asks the shared [`Renderer`] to tick. Most ticks return immediately
//! because the local day has not changed; the interval does not depend on
//! how many spans are tracked.
//!
//! Constructing a scheduler does nothing. [`Scheduler::start`] spawns the
//! timer task on the current tokio runtime and returns a handle to stop it.

use crate::host::HostUi;
use crate::render::{Renderer, TickOutcome};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest accepted time between ticks.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Renderer shared between the render path and the timer task.
pub type SharedRenderer = Arc<Mutex<Renderer>>;

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// A panic mid-tick can at worst lose the entries taken for that pass;
/// the registry itself is always a valid list.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives [`Renderer::tick`] on a fixed interval.
pub struct Scheduler<H> {
    renderer: SharedRenderer,
    host: Arc<Mutex<H>>,
    period: Duration,
}

impl<H> Scheduler<H>
where
    H: HostUi + Send + 'static,
{
    pub fn new(renderer: SharedRenderer, host: Arc<Mutex<H>>) -> Self {
        Self {
            renderer,
            host,
            period: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the tick interval. Periods shorter than
    /// [`MIN_TICK_INTERVAL`] are raised to it.
    pub fn with_period(mut self, period: Duration) -> Self {
        if period < MIN_TICK_INTERVAL {
            tracing::warn!(
                requested_ms = period.as_millis() as u64,
                "Tick interval too short, using minimum"
            );
        }
        self.period = period.max(MIN_TICK_INTERVAL);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one tick right now. Locks the renderer, then the host.
    pub fn tick_now(&self) -> TickOutcome {
        run_tick(&self.renderer, &self.host)
    }

    /// Spawn the timer task. The first tick fires one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let Scheduler {
            renderer,
            host,
            period,
        } = self;

        tracing::info!(period_secs = period.as_secs_f64(), "Starting timestamp refresh");

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        run_tick(&renderer, &host);
                    }
                    _ = &mut stop_rx => break,
                }
            }

            tracing::info!("Timestamp refresh stopped");
        });

        SchedulerHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }
}

fn run_tick<H: HostUi>(renderer: &Mutex<Renderer>, host: &Mutex<H>) -> TickOutcome {
    let mut renderer = lock(renderer);
    let mut host = lock(host);
    renderer.tick(&mut *host)
}

/// Handle to a running scheduler. Dropping it aborts the timer task.
pub struct SchedulerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the timer and wait for the task to finish. A tick already in
    /// progress completes first.
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Timestamp refresh task ended abnormally");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
