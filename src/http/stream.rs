use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;
use url::Url;

use super::payload::RequestSpec;
use crate::error::RequestFailure;
use crate::metrics::StreamTiming;

/// Counts non-blank lines across arbitrarily split body chunks.
///
/// A line counts once its terminating newline arrives (or the stream ends)
/// and it holds at least one non-whitespace byte, so SSE separators and
/// keep-alive newlines are ignored.
#[derive(Debug, Default)]
pub(crate) struct ChunkCounter {
    line_has_content: bool,
    count: u64,
}

impl ChunkCounter {
    /// Feeds raw body bytes and returns how many lines they completed.
    pub(crate) fn feed(&mut self, bytes: &[u8]) -> u64 {
        let mut completed = 0u64;
        for byte in bytes {
            if *byte == b'\n' {
                if self.line_has_content {
                    completed = completed.saturating_add(1);
                }
                self.line_has_content = false;
            } else if !byte.is_ascii_whitespace() {
                self.line_has_content = true;
            }
        }
        self.count = self.count.saturating_add(completed);
        completed
    }

    /// Flushes an unterminated trailing line.
    pub(crate) fn finish(&mut self) -> u64 {
        if !self.line_has_content {
            return 0;
        }
        self.line_has_content = false;
        self.count = self.count.saturating_add(1);
        1
    }

    pub(crate) const fn count(&self) -> u64 {
        self.count
    }
}

/// Sends one streaming completion and times it.
///
/// The clock starts right before the request is sent; ttft is taken when the
/// first non-blank line completes and total time when the body ends. No
/// retries: any failure is returned as-is.
pub(crate) async fn read_stream(
    client: &Client,
    endpoint: &Url,
    spec: &RequestSpec,
) -> Result<StreamTiming, RequestFailure> {
    let start = Instant::now();
    let response = client
        .post(endpoint.clone())
        .json(spec)
        .send()
        .await
        .map_err(|err| RequestFailure::from_send(&err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RequestFailure::Status {
            status: status.as_u16(),
        });
    }

    let mut counter = ChunkCounter::default();
    let mut first_chunk: Option<Duration> = None;
    let mut body = response.bytes_stream();
    while let Some(item) = body.next().await {
        let bytes = item.map_err(|err| RequestFailure::from_read(&err))?;
        if counter.feed(&bytes) > 0 && first_chunk.is_none() {
            first_chunk = Some(start.elapsed());
        }
    }
    if counter.finish() > 0 && first_chunk.is_none() {
        first_chunk = Some(start.elapsed());
    }
    let total_time = start.elapsed();

    // An empty 2xx body still counts as a completed request with ttft 0.
    Ok(StreamTiming::new(
        first_chunk.unwrap_or(Duration::ZERO),
        total_time,
        counter.count(),
    ))
}
