use serde::Serialize;
use thiserror::Error;

/// Why a single streamed completion did not produce a timing sample.
///
/// These never abort a batch: the dispatcher stores them next to the
/// successful results and the aggregator skips them.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestFailure {
    #[error("connection failed: {message}")]
    Connection { message: String },
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("stream interrupted: {message}")]
    Stream { message: String },
    #[error("request timed out")]
    Timeout,
    #[error("concurrency limiter closed before admission")]
    AdmissionClosed,
    #[error("request task aborted: {message}")]
    TaskAborted { message: String },
}

impl RequestFailure {
    /// Classifies an error raised while sending the request or awaiting headers.
    #[must_use]
    pub fn from_send(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return RequestFailure::Timeout;
        }
        RequestFailure::Connection {
            message: err.to_string(),
        }
    }

    /// Classifies an error raised while reading the response body.
    #[must_use]
    pub fn from_read(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return RequestFailure::Timeout;
        }
        RequestFailure::Stream {
            message: err.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            RequestFailure::Connection { .. } => "connection",
            RequestFailure::Status { .. } => "status",
            RequestFailure::Stream { .. } => "stream",
            RequestFailure::Timeout => "timeout",
            RequestFailure::AdmissionClosed => "admission",
            RequestFailure::TaskAborted { .. } => "aborted",
        }
    }
}
