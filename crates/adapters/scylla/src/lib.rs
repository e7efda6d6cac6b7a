//! # feedload-adapter-scylla
//!
//! CQL adapter using the [scylla](https://docs.rs/scylla) driver.
//!
//! ## Responsibilities
//! - Open sessions pinned to a local datacenter
//! - Prepare the load statements at startup, the seeder and analyzer ones
//!   on first use
//! - Implement `WriteSession` (bounded fire-and-forget), `FixtureSource`,
//!   `SeedSink` and `AnalyticsSource` from `feedload-app::ports`
//! - Map between domain types and CQL values
//! - Apply the bundled schema script
//!
//! ## Dependency rule
//! Depends on `feedload-app` (for port traits) and `feedload-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod analytics;
pub mod config;
pub mod error;
mod fixtures;
mod in_flight;
pub mod schema;
mod seed;
pub mod session;
mod statements;

pub use config::ScyllaConfig;
pub use error::ScyllaError;
pub use session::CqlSession;
