use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::limiter::ConcurrencyLimiter;
use crate::args::PositiveUsize;
use crate::error::{AppResult, RequestFailure};
use crate::http::{CompletionSession, RequestSpec, SessionFactory, draw_seeds};
use crate::metrics::RequestResult;

/// Everything one trial produced, in dispatch order.
#[derive(Debug)]
pub struct TrialBatch {
    pub results: Vec<RequestResult>,
    /// Wall clock from first dispatch until the last request terminated.
    /// Opening the session and drawing seeds happen before the clock starts.
    pub batch_time: Duration,
    pub peak_in_flight: usize,
}

/// Fans a burst of requests out to one session and waits for all of them.
pub struct RequestDispatcher {
    factory: Arc<dyn SessionFactory>,
    model: String,
    prompt: String,
}

impl RequestDispatcher {
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, model: &str, prompt: &str) -> Self {
        Self {
            factory,
            model: model.to_owned(),
            prompt: prompt.to_owned(),
        }
    }

    /// Runs one trial: `concurrency` requests behind a limiter of the same size.
    ///
    /// The batch size is tied to the concurrency level, so a trial models a
    /// burst of `concurrency` simultaneous clients. A fresh session (and
    /// connection pool) is opened per trial.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session cannot be opened; request
    /// failures are reported inside the batch.
    pub async fn run_trial(&self, concurrency: PositiveUsize) -> AppResult<TrialBatch> {
        let session = self.factory.open(concurrency.get())?;
        let limiter = ConcurrencyLimiter::new(concurrency);
        let specs = self.build_batch(concurrency.get());

        let start = Instant::now();
        let results = dispatch(&session, &limiter, specs).await;
        let batch_time = start.elapsed();

        debug!(
            "Trial at concurrency {} drained in {:?} (peak in flight {})",
            concurrency.get(),
            batch_time,
            limiter.peak()
        );
        Ok(TrialBatch {
            results,
            batch_time,
            peak_in_flight: limiter.peak(),
        })
    }

    fn build_batch(&self, size: usize) -> Vec<RequestSpec> {
        let mut rng = rand::thread_rng();
        draw_seeds(&mut rng, size)
            .into_iter()
            .map(|seed| RequestSpec::new(&self.model, &self.prompt, seed))
            .collect()
    }
}

/// Spawns every request, gates each on `limiter`, and joins them all.
///
/// One result per spec is returned in spec order; a failing or panicking
/// request never affects its siblings.
pub(super) async fn dispatch(
    session: &Arc<dyn CompletionSession>,
    limiter: &ConcurrencyLimiter,
    specs: Vec<RequestSpec>,
) -> Vec<RequestResult> {
    let mut handles = Vec::with_capacity(specs.len());
    for (request_id, spec) in specs.into_iter().enumerate() {
        let session = Arc::clone(session);
        let limiter = limiter.clone();
        let seed = spec.seed;
        let handle = tokio::spawn(async move {
            let _admission = match limiter.acquire().await {
                Ok(guard) => guard,
                Err(failure) => return RequestResult::failed(request_id, spec.seed, failure),
            };
            match session.stream_completion(&spec).await {
                Ok(timing) => RequestResult::completed(request_id, spec.seed, timing),
                Err(failure) => {
                    warn!(
                        kind = failure.kind(),
                        "Request {} failed: {}", request_id, failure
                    );
                    RequestResult::failed(request_id, spec.seed, failure)
                }
            }
        });
        handles.push((request_id, seed, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (request_id, seed, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(err) => {
                error!("Request {} task aborted: {}", request_id, err);
                results.push(RequestResult::failed(
                    request_id,
                    seed,
                    RequestFailure::TaskAborted {
                        message: err.to_string(),
                    },
                ));
            }
        }
    }
    results
}
