//! Per-request timing types and trial/level aggregation.
mod aggregate;
mod stats;
mod types;


pub use aggregate::{
    AggregateSummary, LevelResults, LevelStats, TrialStats, TrialSummary, summarize_level,
    summarize_trial,
};
pub use stats::{Quantiles, SPARSE_SAMPLE_THRESHOLD, Spread, median, quantile};
pub use types::{RequestResult, StreamTiming};

pub(crate) use types::serialize_secs;
