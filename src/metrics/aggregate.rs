use std::time::Duration;

use serde::Serialize;

use super::stats::{Quantiles, SPARSE_SAMPLE_THRESHOLD, Spread, quantiles, spread};
use super::types::{RequestResult, serialize_secs};

/// min/median/max over one trial's successful requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialStats {
    pub ttft: Spread,
    pub total_time: Spread,
    pub tps: Spread,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub concurrency: usize,
    /// 1-based trial index within the level.
    pub trial: usize,
    #[serde(rename = "batch_time_s", serialize_with = "serialize_secs")]
    pub batch_time: Duration,
    pub requests: usize,
    pub successful: usize,
    /// `None` when no request in the trial succeeded.
    pub stats: Option<TrialStats>,
}

impl TrialSummary {
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.requests.saturating_sub(self.successful)
    }
}

/// p50/p95 and range over every successful request of a level, pooled
/// across trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelStats {
    pub samples: usize,
    /// Fewer than [`SPARSE_SAMPLE_THRESHOLD`] samples: p95 is noisy.
    pub sparse: bool,
    pub ttft: Quantiles,
    pub total_time: Quantiles,
    pub tps: Quantiles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub concurrency: usize,
    pub trials: usize,
    pub requests: usize,
    pub successful: usize,
    /// `None` when no request at this level succeeded.
    pub stats: Option<LevelStats>,
}

/// Result collection scoped to one concurrency level.
///
/// Created empty when a level starts and consumed when it completes.
#[derive(Debug)]
pub struct LevelResults {
    concurrency: usize,
    trials: usize,
    results: Vec<RequestResult>,
}

impl LevelResults {
    #[must_use]
    pub const fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            trials: 0,
            results: Vec::new(),
        }
    }

    /// Merges one trial's results after its fan-in barrier.
    pub fn absorb(&mut self, results: Vec<RequestResult>) {
        self.trials = self.trials.saturating_add(1);
        self.results.extend(results);
    }

    #[must_use]
    pub fn summarize(&self) -> AggregateSummary {
        summarize_level(self.concurrency, self.trials, &self.results)
    }
}

struct Samples {
    ttft: Vec<f64>,
    total_time: Vec<f64>,
    tps: Vec<f64>,
}

impl Samples {
    fn collect(results: &[RequestResult]) -> Self {
        let mut samples = Self {
            ttft: Vec::with_capacity(results.len()),
            total_time: Vec::with_capacity(results.len()),
            tps: Vec::with_capacity(results.len()),
        };
        for timing in results.iter().filter_map(RequestResult::timing) {
            samples.ttft.push(timing.ttft().as_secs_f64());
            samples.total_time.push(timing.total_time().as_secs_f64());
            samples.tps.push(timing.tokens_per_second());
        }
        samples
    }

    fn len(&self) -> usize {
        self.ttft.len()
    }
}

#[must_use]
pub fn summarize_trial(
    concurrency: usize,
    trial: usize,
    batch_time: Duration,
    results: &[RequestResult],
) -> TrialSummary {
    let samples = Samples::collect(results);
    let stats = match (
        spread(&samples.ttft),
        spread(&samples.total_time),
        spread(&samples.tps),
    ) {
        (Some(ttft), Some(total_time), Some(tps)) => Some(TrialStats {
            ttft,
            total_time,
            tps,
        }),
        (None, _, _) | (_, None, _) | (_, _, None) => None,
    };
    TrialSummary {
        concurrency,
        trial,
        batch_time,
        requests: results.len(),
        successful: samples.len(),
        stats,
    }
}

#[must_use]
pub fn summarize_level(
    concurrency: usize,
    trials: usize,
    results: &[RequestResult],
) -> AggregateSummary {
    let samples = Samples::collect(results);
    let stats = match (
        quantiles(&samples.ttft),
        quantiles(&samples.total_time),
        quantiles(&samples.tps),
    ) {
        (Some(ttft), Some(total_time), Some(tps)) => Some(LevelStats {
            samples: samples.len(),
            sparse: samples.len() < SPARSE_SAMPLE_THRESHOLD,
            ttft,
            total_time,
            tps,
        }),
        (None, _, _) | (_, None, _) | (_, _, None) => None,
    };
    AggregateSummary {
        concurrency,
        trials,
        requests: results.len(),
        successful: samples.len(),
        stats,
    }
}
