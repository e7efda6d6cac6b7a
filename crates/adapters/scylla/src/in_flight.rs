//! Admission gate for fire-and-forget writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::ScyllaError;

/// Bounds the writes submitted but not yet acknowledged.
///
/// A permit is held by the detached task of each write and released when
/// the task ends, whatever its outcome.
pub(crate) struct InFlight {
    permits: Arc<Semaphore>,
    max: u32,
    closed: AtomicBool,
}

impl InFlight {
    pub(crate) fn new(max: u32) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max as usize)),
            max,
            closed: AtomicBool::new(false),
        }
    }

    /// Reserve a slot for one write without waiting.
    pub(crate) fn try_admit(&self) -> Result<OwnedSemaphorePermit, ScyllaError> {
        if self.is_closed() {
            return Err(ScyllaError::Closed);
        }
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| ScyllaError::Saturated { max: self.max })
    }

    /// Writes admitted and not yet finished.
    pub(crate) fn pending(&self) -> usize {
        (self.max as usize).saturating_sub(self.permits.available_permits())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop admitting writes. Writes already admitted keep running and are
    /// not awaited.
    ///
    /// Returns the number still pending, or `None` when already closed.
    pub(crate) fn close(&self) -> Option<usize> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.permits.close();
        Some(self.pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn should_reject_when_every_slot_is_taken() {
        let gate = InFlight::new(2);
        let _a = gate.try_admit().unwrap();
        let _b = gate.try_admit().unwrap();

        let err = gate.try_admit().unwrap_err();

        assert!(matches!(err, ScyllaError::Saturated { max: 2 }));
        assert_eq!(gate.pending(), 2);
    }

    #[test]
    fn should_free_slot_when_permit_is_dropped() {
        let gate = InFlight::new(1);
        let permit = gate.try_admit().unwrap();
        assert!(gate.try_admit().is_err());

        drop(permit);

        assert_eq!(gate.pending(), 0);
        assert!(gate.try_admit().is_ok());
    }

    #[test]
    fn should_reject_after_close() {
        let gate = InFlight::new(4);
        assert_eq!(gate.close(), Some(0));

        assert!(gate.is_closed());
        assert!(matches!(gate.try_admit(), Err(ScyllaError::Closed)));
    }

    #[test]
    fn should_report_close_only_once() {
        let gate = InFlight::new(4);
        assert_eq!(gate.close(), Some(0));
        assert_eq!(gate.close(), None);
    }

    #[tokio::test]
    async fn should_release_slot_when_detached_write_finishes() {
        let gate = InFlight::new(1);
        let permit = gate.try_admit().unwrap();
        let task = tokio::spawn(async move {
            let _permit = permit;
        });

        task.await.unwrap();

        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test]
    async fn should_close_without_waiting_for_pending_writes() {
        let gate = InFlight::new(8);
        let (release, stalled) = oneshot::channel::<()>();
        let permit = gate.try_admit().unwrap();
        let task = tokio::spawn(async move {
            let _permit = permit;
            let _ = stalled.await;
        });

        assert_eq!(gate.close(), Some(1));
        assert!(matches!(gate.try_admit(), Err(ScyllaError::Closed)));

        release.send(()).unwrap();
        task.await.unwrap();
        assert_eq!(gate.pending(), 0);
    }
}
