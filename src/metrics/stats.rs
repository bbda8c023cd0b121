//! Order statistics over `f64` samples.
//!
//! Quantiles use linear interpolation between closest ranks: for a sample
//! sorted ascending with `n` values, quantile `q` sits at rank
//! `q * (n - 1)` and blends the two neighbouring values by the fractional
//! part. With fewer than [`SPARSE_SAMPLE_THRESHOLD`] samples the upper
//! quantiles are driven by one or two observations and should be read as
//! noisy.

use serde::Serialize;

/// Below this many samples p95 is flagged as unstable.
pub const SPARSE_SAMPLE_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantiles {
    pub p50: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Middle value of an ascending sample, averaging the two middle values for
/// even counts.
#[must_use]
pub fn median(sorted: &[f64]) -> Option<f64> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    let upper = *sorted.get(mid)?;
    if len % 2 == 1 {
        return Some(upper);
    }
    let lower = *sorted.get(mid.checked_sub(1)?)?;
    Some((lower + upper) / 2.0)
}

/// Linearly interpolated quantile of an ascending sample; `q` is clamped to `[0, 1]`.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = q.clamp(0.0, 1.0) * last as f64;
    let lower_rank = rank.floor();
    let fraction = rank - lower_rank;
    let lower_idx = (lower_rank as usize).min(last);
    let upper_idx = lower_idx.saturating_add(1).min(last);
    let lower = *sorted.get(lower_idx)?;
    let upper = *sorted.get(upper_idx)?;
    Some(lower + (upper - lower) * fraction)
}

pub(crate) fn spread(values: &[f64]) -> Option<Spread> {
    let sorted = sorted(values);
    Some(Spread {
        min: *sorted.first()?,
        median: median(&sorted)?,
        max: *sorted.last()?,
    })
}

pub(crate) fn quantiles(values: &[f64]) -> Option<Quantiles> {
    let sorted = sorted(values);
    Some(Quantiles {
        p50: median(&sorted)?,
        p95: quantile(&sorted, 0.95)?,
        min: *sorted.first()?,
        max: *sorted.last()?,
    })
}
