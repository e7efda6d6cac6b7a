//! Rate scheduler — fixed-rate periodic tasks and one-shot timers on tokio.
//!
//! Each scheduled task runs in its own tokio task, so different tasks may
//! fire in parallel while invocations of one task stay serialized. Fires are
//! aligned on `start + N * period` rather than on the end of the previous
//! fire; a fire that is late by more than a whole period is skipped instead
//! of queued.
//!
//! A task that returns an error or panics is logged and fires again on its
//! next tick.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

/// How a [`Scheduler::shutdown`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every task stopped within the drain window.
    Drained,
    /// The drain window elapsed; `pending` tasks were aborted.
    ForceCancelled { pending: usize },
}

/// Owns a set of scheduled tasks and stops them together.
pub struct Scheduler {
    stop: watch::Sender<bool>,
    tasks: JoinSet<()>,
}

impl Default for Scheduler {
    fn default() -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            stop,
            tasks: JoinSet::new(),
        }
    }
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `period`, the first time after `initial_delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_at_fixed_rate<F, E>(
        &mut self,
        name: &'static str,
        initial_delay: Duration,
        period: Duration,
        mut task: F,
    ) where
        F: FnMut() -> Result<(), E> + Send + 'static,
        E: Display,
    {
        // `interval_at` panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let mut stop = self.stop.subscribe();

        self.tasks.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    _ = ticker.tick() => run_guarded(name, &mut task),
                }
            }

            tracing::debug!(task = name, "scheduled task stopped");
        });

        tracing::debug!(
            task = name,
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "scheduled fixed-rate task"
        );
    }

    /// Run `task` once after `delay`, unless the scheduler shuts down first.
    pub fn schedule_once<F>(&mut self, name: &'static str, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut stop = self.stop.subscribe();

        self.tasks.spawn(async move {
            tokio::select! {
                biased;
                _ = stop.changed() => {}
                () = time::sleep(delay) => {
                    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                        tracing::error!(task = name, "one-shot task panicked");
                    }
                }
            }
        });

        tracing::debug!(
            task = name,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "scheduled one-shot task"
        );
    }

    /// Stop accepting fires, wait up to `timeout` for running tasks to
    /// return, then abort whatever is left.
    pub async fn shutdown(mut self, timeout: Duration) -> ShutdownOutcome {
        self.stop.send_replace(true);

        let drain = async {
            while let Some(result) = self.tasks.join_next().await {
                if let Err(err) = result {
                    tracing::error!(error = %err, "scheduled task ended abnormally");
                }
            }
        };

        if time::timeout(timeout, drain).await.is_ok() {
            return ShutdownOutcome::Drained;
        }

        let pending = self.tasks.len();
        tracing::warn!(pending, "drain window elapsed, aborting scheduled tasks");
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}

        ShutdownOutcome::ForceCancelled { pending }
    }
}

fn run_guarded<F, E>(name: &'static str, task: &mut F)
where
    F: FnMut() -> Result<(), E>,
    E: Display,
{
    match panic::catch_unwind(AssertUnwindSafe(|| task())) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(task = name, error = %err, "scheduled task failed"),
        Err(_) => tracing::error!(task = name, "scheduled task panicked"),
    }
}
