use tracing::{info, warn};

use crate::error::AppResult;
use crate::metrics::{AggregateSummary, TrialSummary};
use crate::sweep::SweepObserver;

/// Reports progress through the log when stdout is reserved for JSON.
#[derive(Debug, Default)]
pub struct LogObserver {
    trials: usize,
}

impl SweepObserver for LogObserver {
    fn level_started(&mut self, concurrency: usize, trials: usize) -> AppResult<()> {
        self.trials = trials;
        info!("Concurrency level {} ({} runs)", concurrency, trials);
        Ok(())
    }

    fn trial_completed(&mut self, summary: &TrialSummary) -> AppResult<()> {
        if summary.stats.is_none() {
            warn!(
                "Run {}/{} at concurrency {}: no successful requests",
                summary.trial, self.trials, summary.concurrency
            );
        } else {
            info!(
                "Run {}/{} at concurrency {}: {}/{} ok in {:.2}s",
                summary.trial,
                self.trials,
                summary.concurrency,
                summary.successful,
                summary.requests,
                summary.batch_time.as_secs_f64()
            );
        }
        Ok(())
    }

    fn level_completed(&mut self, aggregate: &AggregateSummary) -> AppResult<()> {
        info!(
            "Concurrency level {} done: {}/{} successful",
            aggregate.concurrency, aggregate.successful, aggregate.requests
        );
        Ok(())
    }
}
