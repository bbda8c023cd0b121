use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};

use super::state::SweepState;
use crate::args::{ConcurrencyLevels, PositiveUsize};
use crate::bench::RequestDispatcher;
use crate::error::AppResult;
use crate::metrics::{AggregateSummary, LevelResults, TrialSummary, serialize_secs, summarize_trial};

/// Receives progress as the sweep advances.
pub trait SweepObserver {
    /// # Errors
    ///
    /// Returns an error when the observer cannot record the event.
    fn level_started(&mut self, concurrency: usize, trials: usize) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the observer cannot record the event.
    fn trial_completed(&mut self, summary: &TrialSummary) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the observer cannot record the event.
    fn level_completed(&mut self, aggregate: &AggregateSummary) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub concurrency: usize,
    pub trials: Vec<TrialSummary>,
    pub aggregate: AggregateSummary,
}

/// Everything one complete pass over the levels produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub levels: Vec<LevelReport>,
    #[serde(rename = "elapsed_s", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn aggregates(&self) -> impl Iterator<Item = &AggregateSummary> {
        self.levels.iter().map(|level| &level.aggregate)
    }
}

struct LevelProgress {
    results: LevelResults,
    trials: Vec<TrialSummary>,
}

impl LevelProgress {
    const fn new(concurrency: usize) -> Self {
        Self {
            results: LevelResults::new(concurrency),
            trials: Vec::new(),
        }
    }
}

pub struct SweepController {
    dispatcher: RequestDispatcher,
    levels: Vec<PositiveUsize>,
    trials: PositiveUsize,
}

impl SweepController {
    #[must_use]
    pub fn new(
        dispatcher: RequestDispatcher,
        levels: &ConcurrencyLevels,
        trials: PositiveUsize,
    ) -> Self {
        Self {
            dispatcher,
            levels: levels.as_slice().to_vec(),
            trials,
        }
    }

    /// Runs every level once, in order, and returns what each one measured.
    ///
    /// Results are collected into a store owned by the current level, so
    /// nothing carries over between levels or between calls.
    ///
    /// # Errors
    ///
    /// Returns an error when a session cannot be opened or the observer
    /// fails. Individual request failures never end the sweep.
    pub async fn run(&self, observer: &mut dyn SweepObserver) -> AppResult<SweepReport> {
        let started = Instant::now();
        let trials = self.trials.get();
        let mut reports = Vec::with_capacity(self.levels.len());
        let mut progress: Option<LevelProgress> = None;
        let mut state = SweepState::Idle;

        loop {
            state = state.next(&self.levels, trials);
            debug!("Sweep state: {:?}", state);
            match state {
                SweepState::Idle => {}
                SweepState::RunningLevel { concurrency, .. } => {
                    info!("Starting concurrency level {}", concurrency.get());
                    observer.level_started(concurrency.get(), trials)?;
                    progress = Some(LevelProgress::new(concurrency.get()));
                }
                SweepState::RunningTrial {
                    concurrency, trial, ..
                } => {
                    let batch = self.dispatcher.run_trial(concurrency).await?;
                    let summary =
                        summarize_trial(concurrency.get(), trial, batch.batch_time, &batch.results);
                    observer.trial_completed(&summary)?;
                    let level =
                        progress.get_or_insert_with(|| LevelProgress::new(concurrency.get()));
                    level.results.absorb(batch.results);
                    level.trials.push(summary);
                }
                SweepState::LevelComplete { concurrency, .. } => {
                    let level = progress
                        .take()
                        .unwrap_or_else(|| LevelProgress::new(concurrency.get()));
                    let aggregate = level.results.summarize();
                    observer.level_completed(&aggregate)?;
                    reports.push(LevelReport {
                        concurrency: concurrency.get(),
                        trials: level.trials,
                        aggregate,
                    });
                }
                SweepState::Done => break,
            }
        }

        Ok(SweepReport {
            levels: reports,
            elapsed: started.elapsed(),
        })
    }
}
