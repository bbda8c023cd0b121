use thiserror::Error;

/// Failures opening a per-trial session; these abort the sweep.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Could not open a streaming session (HTTP client setup failed): {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}
