//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`FeedLoadError`] via `From`. The variants follow the error taxonomy of
//! the harness: `ConnectFailed`, `PrepareFailed` and `NoFixtureData` are
//! startup-fatal, `SubmitFailed` is a per-event failure that is logged and
//! swallowed.

/// Boxed source error carried across crate boundaries.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error shared by the application layer and the adapters.
#[derive(Debug, thiserror::Error)]
pub enum FeedLoadError {
    /// The session to the cluster could not be established (network,
    /// authentication, unknown keyspace).
    #[error("failed to connect to the cluster")]
    ConnectFailed(#[source] BoxedError),

    /// A server-side prepared statement was rejected.
    #[error("failed to prepare statement")]
    PrepareFailed(#[source] BoxedError),

    /// A synchronous read or write failed.
    #[error("query failed")]
    QueryFailed(#[source] BoxedError),

    /// The reference tables are empty; the seeder has not been run.
    #[error("no fixture data")]
    NoFixtureData(#[from] NoFixtureDataError),

    /// A fire-and-forget submission was rejected before reaching the driver.
    #[error("write submission failed")]
    SubmitFailed(#[source] BoxedError),

    /// Configuration or input validation failed.
    #[error("validation error")]
    Validation(#[from] ValidationError),
}

impl FeedLoadError {
    /// Whether this error must abort startup with a non-zero exit code.
    #[must_use]
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed(_)
                | Self::PrepareFailed(_)
                | Self::NoFixtureData(_)
                | Self::Validation(_)
        )
    }
}

/// Raised when the startup reads return no users or no posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("found {users} users and {posts} posts, run the seeder first")]
pub struct NoFixtureDataError {
    /// Number of user rows loaded.
    pub users: usize,
    /// Number of post rows loaded.
    pub posts: usize,
}

/// Invalid settings or input values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A per-second rate is zero.
    #[error("{stream} rate must be greater than zero")]
    ZeroRate {
        /// Which stream (`comments` or `likes`).
        stream: &'static str,
    },

    /// A per-second rate would need a sub-millisecond period.
    #[error("{stream} rate {rate}/s exceeds the maximum of {max}/s")]
    RateTooHigh {
        /// Which stream (`comments` or `likes`).
        stream: &'static str,
        /// The configured rate.
        rate: u32,
        /// The highest supported rate.
        max: u32,
    },

    /// A limit or capacity that must be positive is zero.
    #[error("{field} must be greater than zero")]
    ZeroLimit {
        /// The offending setting.
        field: &'static str,
    },

    /// A required text field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// The offending setting.
        field: &'static str,
    },

    /// A name is not a plain CQL identifier.
    #[error("{field} must be 1 to 48 letters, digits or underscores")]
    InvalidName {
        /// The offending setting.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_fixture_counts() {
        let err = NoFixtureDataError { users: 0, posts: 5 };
        assert_eq!(
            err.to_string(),
            "found 0 users and 5 posts, run the seeder first"
        );
    }

    #[test]
    fn should_convert_fixture_error_into_top_level_error() {
        let err: FeedLoadError = NoFixtureDataError { users: 1, posts: 0 }.into();
        assert!(matches!(err, FeedLoadError::NoFixtureData(_)));
    }

    #[test]
    fn should_classify_startup_fatal_errors() {
        let fatal: FeedLoadError = NoFixtureDataError { users: 0, posts: 0 }.into();
        assert!(fatal.is_startup_fatal());

        let io = std::io::Error::other("boom");
        assert!(FeedLoadError::ConnectFailed(Box::new(io)).is_startup_fatal());

        let io = std::io::Error::other("boom");
        assert!(!FeedLoadError::SubmitFailed(Box::new(io)).is_startup_fatal());
    }

    #[test]
    fn should_display_rate_validation_errors() {
        let err = ValidationError::ZeroRate { stream: "likes" };
        assert_eq!(err.to_string(), "likes rate must be greater than zero");

        let err = ValidationError::RateTooHigh {
            stream: "comments",
            rate: 5000,
            max: 1000,
        };
        assert_eq!(
            err.to_string(),
            "comments rate 5000/s exceeds the maximum of 1000/s"
        );
    }
}
