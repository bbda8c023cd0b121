use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::args::PositiveUsize;
use crate::error::RequestFailure;

/// Caps how many requests may be past admission at once.
///
/// Waiters are served in no particular order. The limiter also counts
/// admitted requests so tests and logs can check the cap held.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    permits: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// Held while a request is in flight; releases its permit on drop.
#[derive(Debug)]
pub struct AdmissionGuard {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        // Runs before `_permit` is released, so the counter never overshoots.
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyLimiter {
    #[must_use]
    pub fn new(capacity: PositiveUsize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity.get())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for a free permit.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::AdmissionClosed`] once the limiter is closed.
    pub async fn acquire(&self) -> Result<AdmissionGuard, RequestFailure> {
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                tracing::debug!("Admission refused: {}", err);
                return Err(RequestFailure::AdmissionClosed);
            }
        };
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak.fetch_max(now, Ordering::SeqCst);
        Ok(AdmissionGuard {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Refuses every pending and future acquisition.
    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.permits.close();
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously admitted requests seen so far.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}
