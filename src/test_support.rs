use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppResult, RequestFailure};
use crate::http::{CompletionSession, RequestSpec, SessionFactory};
use crate::metrics::StreamTiming;

pub(crate) fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Answers every request with the same timing after an optional delay.
///
/// Tracks how many calls are running at once so tests can check the
/// limiter independently of its own counters.
pub(crate) struct ScriptedSession {
    timing: StreamTiming,
    delay: Duration,
    fail_every: Option<usize>,
    calls: AtomicUsize,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl ScriptedSession {
    pub(crate) const fn fixed(timing: StreamTiming) -> Self {
        Self {
            timing,
            delay: Duration::ZERO,
            fail_every: None,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
        }
    }

    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails call `n`, `2n`, ... (1-based) with a 500 status.
    pub(crate) const fn failing_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionSession for ScriptedSession {
    async fn stream_completion(&self, _spec: &RequestSpec) -> Result<StreamTiming, RequestFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        let now = self.active.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak_active.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        if let Some(n) = self.fail_every
            && n > 0
            && call % n == 0
        {
            return Err(RequestFailure::Status { status: 500 });
        }
        Ok(self.timing)
    }
}

/// Hands out one shared session and counts how often it was opened.
pub(crate) struct SharedSessionFactory {
    session: Arc<ScriptedSession>,
    opens: AtomicUsize,
}

impl SharedSessionFactory {
    pub(crate) fn new(session: ScriptedSession) -> Self {
        Self {
            session: Arc::new(session),
            opens: AtomicUsize::new(0),
        }
    }

    pub(crate) fn session(&self) -> &ScriptedSession {
        &self.session
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SessionFactory for SharedSessionFactory {
    fn open(&self, _concurrency: usize) -> AppResult<Arc<dyn CompletionSession>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let session: Arc<dyn CompletionSession> = Arc::<ScriptedSession>::clone(&self.session);
        Ok(session)
    }
}

/// 50ms to first chunk, 500ms in total, 10 chunks: 20 chunks per second.
pub(crate) fn reference_timing() -> StreamTiming {
    StreamTiming::new(Duration::from_millis(50), Duration::from_millis(500), 10)
}
