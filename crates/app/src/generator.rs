//! Load generator lifecycle — wires the cache, factories, pipeline and
//! scheduler together and walks the process through its phases:
//!
//! ```text
//! INIT → READY → RUNNING → DRAINING → CLOSED
//! ```
//!
//! - `INIT → READY` once the reference cache is loaded ([`LoadGenerator::initialize`]).
//! - `READY → RUNNING` when the streams are scheduled ([`LoadGenerator::start`]).
//! - `RUNNING → DRAINING` when the run duration elapses or the interrupt
//!   future resolves ([`RunningLoad::wait`]).
//! - `DRAINING → CLOSED` after the scheduler has drained and the session
//!   has been released.
//!
//! The terminate timer only signals; the scheduler is shut down by the
//! owner of [`RunningLoad`], never from one of its own tasks.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

use feedload_domain::error::{FeedLoadError, ValidationError};

use crate::factory::EventFactory;
use crate::pipeline::{CounterSnapshot, WritePipeline};
use crate::ports::{FixtureSource, WriteSession};
use crate::reference_cache::{DEFAULT_REFERENCE_LIMIT, ReferenceCache};
use crate::scheduler::{Scheduler, ShutdownOutcome};

/// Highest supported per-second rate (one fire per millisecond).
pub const MAX_RATE: u32 = 1000;

/// Tunables of a load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Comments submitted per second.
    pub comments_per_second: u32,
    /// Likes submitted per second.
    pub likes_per_second: u32,
    /// Rows read from each reference table at startup.
    pub reference_limit: usize,
    /// Delay before the first progress line.
    pub report_initial_delay: Duration,
    /// Time between progress lines.
    pub report_interval: Duration,
    /// How long shutdown waits for running tasks before aborting them.
    pub drain_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            comments_per_second: 20,
            likes_per_second: 50,
            reference_limit: DEFAULT_REFERENCE_LIMIT,
            report_initial_delay: Duration::from_secs(1),
            report_interval: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(5),
        }
    }
}

impl LoadConfig {
    /// Check rates and limits.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for zero or too-high rates and for a
    /// zero reference limit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rate("comments", self.comments_per_second)?;
        validate_rate("likes", self.likes_per_second)?;
        if self.reference_limit == 0 {
            return Err(ValidationError::ZeroLimit {
                field: "reference_limit",
            });
        }
        if self.report_interval.is_zero() {
            return Err(ValidationError::ZeroLimit {
                field: "report_interval",
            });
        }
        Ok(())
    }

    /// Time between two comment fires.
    #[must_use]
    pub fn comment_period(&self) -> Duration {
        period_of(self.comments_per_second)
    }

    /// Time between two like fires.
    #[must_use]
    pub fn like_period(&self) -> Duration {
        period_of(self.likes_per_second)
    }
}

fn validate_rate(stream: &'static str, rate: u32) -> Result<(), ValidationError> {
    if rate == 0 {
        return Err(ValidationError::ZeroRate { stream });
    }
    if rate > MAX_RATE {
        return Err(ValidationError::RateTooHigh {
            stream,
            rate,
            max: MAX_RATE,
        });
    }
    Ok(())
}

fn period_of(rate: u32) -> Duration {
    Duration::from_secs(1) / rate.max(1)
}

/// Process-wide lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Ready,
    Running,
    Draining,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Closed => "closed",
        })
    }
}

#[derive(Debug)]
struct PhaseTracker {
    tx: watch::Sender<Phase>,
}

impl PhaseTracker {
    fn new() -> Self {
        let (tx, _) = watch::channel(Phase::Init);
        Self { tx }
    }

    fn advance(&self, to: Phase) {
        let from = self.tx.send_replace(to);
        tracing::info!(%from, %to, "phase transition");
    }

    fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured duration elapsed.
    Elapsed,
    /// The interrupt future resolved first.
    Interrupted,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub totals: CounterSnapshot,
    pub shutdown: ShutdownOutcome,
    pub elapsed: Duration,
}

/// A generator in the `READY` phase.
pub struct LoadGenerator<S> {
    config: LoadConfig,
    cache: Arc<ReferenceCache>,
    pipeline: Arc<WritePipeline<S>>,
    phase: PhaseTracker,
}

impl<S: WriteSession + 'static> LoadGenerator<S> {
    /// Validate `config` and load the reference cache from `fixtures`.
    ///
    /// The session is closed before returning an error, so a failed
    /// startup never leaks it.
    ///
    /// # Errors
    ///
    /// Returns [`FeedLoadError::Validation`] for a bad configuration, a
    /// query error from `fixtures`, or [`FeedLoadError::NoFixtureData`]
    /// when either reference table is empty.
    pub async fn initialize<F: FixtureSource>(
        config: LoadConfig,
        fixtures: &F,
        session: S,
    ) -> Result<Self, FeedLoadError> {
        let phase = PhaseTracker::new();

        let loaded = match config.validate() {
            Ok(()) => ReferenceCache::load(fixtures, config.reference_limit).await,
            Err(err) => Err(err.into()),
        };
        let cache = match loaded {
            Ok(cache) => cache,
            Err(err) => {
                session.close().await;
                return Err(err);
            }
        };

        phase.advance(Phase::Ready);

        Ok(Self {
            config,
            cache: Arc::new(cache),
            pipeline: Arc::new(WritePipeline::new(session)),
            phase,
        })
    }

    /// Watch the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// The loaded reference cache.
    #[must_use]
    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Schedule the comment, like, report and terminate tasks.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(self, duration: Duration) -> RunningLoad<S> {
        let Self {
            config,
            cache,
            pipeline,
            phase,
        } = self;
        let mut scheduler = Scheduler::new();

        let mut comments = EventFactory::new(Arc::clone(&cache));
        let comment_pipeline = Arc::clone(&pipeline);
        scheduler.schedule_at_fixed_rate(
            "comment-fire",
            Duration::ZERO,
            config.comment_period(),
            move || comment_pipeline.write_comment(&comments.make_comment()),
        );

        let mut likes = EventFactory::new(cache);
        let like_pipeline = Arc::clone(&pipeline);
        scheduler.schedule_at_fixed_rate(
            "like-fire",
            Duration::ZERO,
            config.like_period(),
            move || like_pipeline.write_like(&likes.make_like()),
        );

        let counters = pipeline.counters();
        let (comment_rate, like_rate) = (config.comments_per_second, config.likes_per_second);
        scheduler.schedule_at_fixed_rate(
            "report",
            config.report_initial_delay,
            config.report_interval,
            move || {
                report_progress(counters.snapshot(), comment_rate, like_rate);
                Ok::<(), Infallible>(())
            },
        );

        let (terminate_tx, terminate_rx) = oneshot::channel();
        scheduler.schedule_once("terminate", duration, move || {
            let _ = terminate_tx.send(());
        });

        tracing::info!(
            duration_secs = duration.as_secs(),
            comments_per_second = comment_rate,
            likes_per_second = like_rate,
            "starting write load generation"
        );
        phase.advance(Phase::Running);

        RunningLoad {
            config,
            pipeline,
            scheduler,
            terminate: terminate_rx,
            phase,
            started_at: Instant::now(),
        }
    }
}

fn report_progress(totals: CounterSnapshot, comment_rate: u32, like_rate: u32) {
    tracing::info!(
        comments = totals.comments,
        likes = totals.likes,
        "Total comments: {}, Total likes: {} (current rates: ~{comment_rate} comments/sec, ~{like_rate} likes/sec)",
        totals.comments,
        totals.likes,
    );
}

/// A generator in the `RUNNING` phase.
pub struct RunningLoad<S> {
    config: LoadConfig,
    pipeline: Arc<WritePipeline<S>>,
    scheduler: Scheduler,
    terminate: oneshot::Receiver<()>,
    phase: PhaseTracker,
    started_at: Instant,
}

impl<S: WriteSession + 'static> RunningLoad<S> {
    /// Watch the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Current value of the in-process counters.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.pipeline.counters().snapshot()
    }

    /// Run until the duration elapses or `interrupt` resolves, then drain
    /// the scheduler, release the session and report the final counters.
    pub async fn wait<I>(self, interrupt: I) -> RunSummary
    where
        I: Future<Output = ()>,
    {
        let Self {
            config,
            pipeline,
            scheduler,
            mut terminate,
            phase,
            started_at,
        } = self;

        let reason = tokio::select! {
            _ = &mut terminate => StopReason::Elapsed,
            () = interrupt => StopReason::Interrupted,
        };

        phase.advance(Phase::Draining);
        tracing::info!(?reason, "stopping load generation");

        let shutdown = scheduler.shutdown(config.drain_timeout).await;
        pipeline.session().close().await;

        let totals = pipeline.counters().snapshot();
        phase.advance(Phase::Closed);
        tracing::info!(
            comments = totals.comments,
            likes = totals.likes,
            "Final stats - Total comments: {}, Total likes: {}",
            totals.comments,
            totals.likes,
        );

        RunSummary {
            reason,
            totals,
            shutdown,
            elapsed: started_at.elapsed(),
        }
    }
}
