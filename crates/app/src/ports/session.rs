//! Write session port — fire-and-forget submission of writes.

use std::future::Future;

use feedload_domain::error::FeedLoadError;
use feedload_domain::projection::Write;

/// A shared session that accepts writes without waiting for them to land.
///
/// Implementations must tolerate arbitrary concurrency on
/// [`execute_async`](Self::execute_async): the comment and like streams
/// submit from different tasks at the same time.
pub trait WriteSession: Send + Sync {
    /// Hand a write to the driver and return immediately.
    ///
    /// `Ok(())` means the write was accepted for submission, not that it
    /// was applied. Failures that happen after acceptance are the adapter's
    /// to log.
    ///
    /// # Errors
    ///
    /// Returns [`FeedLoadError::SubmitFailed`] when the write cannot be
    /// handed over (session closed, too many writes in flight, …).
    fn execute_async(&self, write: Write) -> Result<(), FeedLoadError>;

    /// Release the session. Later submissions fail; calling it twice is a
    /// no-op.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

impl<T: WriteSession> WriteSession for std::sync::Arc<T> {
    fn execute_async(&self, write: Write) -> Result<(), FeedLoadError> {
        (**self).execute_async(write)
    }

    fn close(&self) -> impl Future<Output = ()> + Send {
        (**self).close()
    }
}
