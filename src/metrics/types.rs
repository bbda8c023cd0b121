use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::RequestFailure;

/// Timing of one completed stream.
///
/// `chunk_count` counts non-empty lines of the response body. A line may hold
/// zero, one or several model tokens depending on the server's framing, so
/// the derived tokens-per-second figure is a throughput proxy rather than an
/// exact token rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamTiming {
    #[serde(rename = "ttft_s", serialize_with = "serialize_secs")]
    ttft: Duration,
    #[serde(rename = "total_time_s", serialize_with = "serialize_secs")]
    total_time: Duration,
    chunk_count: u64,
}

impl StreamTiming {
    /// Builds a timing sample; `ttft` is clamped so it never exceeds `total_time`.
    #[must_use]
    pub fn new(ttft: Duration, total_time: Duration, chunk_count: u64) -> Self {
        Self {
            ttft: ttft.min(total_time),
            total_time,
            chunk_count,
        }
    }

    #[must_use]
    pub const fn ttft(&self) -> Duration {
        self.ttft
    }

    #[must_use]
    pub const fn total_time(&self) -> Duration {
        self.total_time
    }

    #[must_use]
    pub const fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    /// Chunks per second over the whole request, 0 when no time elapsed.
    #[must_use]
    pub fn tokens_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.chunk_count as f64 / secs
        } else {
            0.0
        }
    }
}

/// Outcome of exactly one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResult {
    pub request_id: usize,
    pub seed: u64,
    pub outcome: Result<StreamTiming, RequestFailure>,
}

impl RequestResult {
    #[must_use]
    pub const fn completed(request_id: usize, seed: u64, timing: StreamTiming) -> Self {
        Self {
            request_id,
            seed,
            outcome: Ok(timing),
        }
    }

    #[must_use]
    pub const fn failed(request_id: usize, seed: u64, failure: RequestFailure) -> Self {
        Self {
            request_id,
            seed,
            outcome: Err(failure),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn timing(&self) -> Option<&StreamTiming> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&RequestFailure> {
        self.outcome.as_ref().err()
    }
}

pub(crate) fn serialize_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}
