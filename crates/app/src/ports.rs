//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the cluster.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod analytics;
pub mod fixtures;
pub mod seed;
pub mod session;

pub use analytics::AnalyticsSource;
pub use fixtures::FixtureSource;
pub use seed::SeedSink;
pub use session::WriteSession;
