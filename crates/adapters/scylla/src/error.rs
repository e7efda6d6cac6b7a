//! Driver-specific error type wrapping scylla errors.

use feedload_domain::error::{BoxedError, FeedLoadError};
use scylla::errors::{ExecutionError, NewSessionError, PrepareError};

/// Errors originating from the CQL layer.
#[derive(Debug, thiserror::Error)]
pub enum ScyllaError {
    /// The session could not be established.
    #[error("session error")]
    Connect(#[from] NewSessionError),

    /// The server rejected a statement at prepare time.
    #[error("prepare error")]
    Prepare(#[from] PrepareError),

    /// A statement or batch failed to execute.
    #[error("execution error")]
    Execution(#[from] ExecutionError),

    /// A result could not be decoded into the expected row type.
    #[error("row decoding error")]
    Decode(#[source] BoxedError),

    /// A timestamp column held a value chrono cannot represent.
    #[error("timestamp {0}ms is out of range")]
    InvalidTimestamp(i64),

    /// Too many writes are awaiting acknowledgement.
    #[error("{max} writes already in flight")]
    Saturated { max: u32 },

    /// The session was closed.
    #[error("session closed")]
    Closed,
}

impl ScyllaError {
    pub(crate) fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Box::new(err))
    }
}

impl From<ScyllaError> for FeedLoadError {
    fn from(err: ScyllaError) -> Self {
        match err {
            ScyllaError::Connect(_) => Self::ConnectFailed(Box::new(err)),
            ScyllaError::Prepare(_) => Self::PrepareFailed(Box::new(err)),
            ScyllaError::Saturated { .. } | ScyllaError::Closed => {
                Self::SubmitFailed(Box::new(err))
            }
            ScyllaError::Execution(_)
            | ScyllaError::Decode(_)
            | ScyllaError::InvalidTimestamp(_) => Self::QueryFailed(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_submission_errors_to_submit_failed() {
        let err: FeedLoadError = ScyllaError::Saturated { max: 8 }.into();
        assert!(matches!(err, FeedLoadError::SubmitFailed(_)));
        assert!(!err.is_startup_fatal());

        let err: FeedLoadError = ScyllaError::Closed.into();
        assert!(matches!(err, FeedLoadError::SubmitFailed(_)));
    }

    #[test]
    fn should_map_decode_errors_to_query_failed() {
        let err: FeedLoadError = ScyllaError::InvalidTimestamp(i64::MAX).into();
        assert!(matches!(err, FeedLoadError::QueryFailed(_)));
    }

    #[test]
    fn should_keep_driver_error_as_source() {
        let err: FeedLoadError = ScyllaError::Saturated { max: 8 }.into();
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "8 writes already in flight");
    }
}
