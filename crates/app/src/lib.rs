//! # feedload-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `FixtureSource` — startup reads of `users` and `posts`
//!   - `WriteSession` — fire-and-forget writes and session shutdown
//!   - `SeedSink` — awaited inserts used by the seeder
//!   - `AnalyticsSource` — read-side queries used by the analyzer
//! - Provide the **use-cases**:
//!   - `LoadGenerator` — the two rate-driven streams, progress reporting,
//!     timed termination and graceful shutdown
//!   - `Seeder` — synthetic fixtures
//!   - `Analyzer` — reports over what was written
//! - Provide **in-process infrastructure** (fixed-rate scheduler, counters)
//!   that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `feedload-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod analyzer;
pub mod factory;
pub mod generator;
pub mod pipeline;
pub mod ports;
pub mod reference_cache;
pub mod scheduler;
pub mod seeder;
