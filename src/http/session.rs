use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::error;
use url::Url;

use super::payload::RequestSpec;
use super::stream::read_stream;
use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError, RequestFailure};
use crate::metrics::StreamTiming;

/// Issues streamed completions over one shared connection pool.
#[async_trait]
pub trait CompletionSession: Send + Sync {
    async fn stream_completion(&self, spec: &RequestSpec) -> Result<StreamTiming, RequestFailure>;
}

/// Opens a fresh session for every trial.
pub trait SessionFactory: Send + Sync {
    /// Opens a session sized for `concurrency` simultaneous requests.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be constructed.
    fn open(&self, concurrency: usize) -> AppResult<Arc<dyn CompletionSession>>;
}

#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    endpoint: Url,
    request_timeout: Option<Duration>,
}

impl HttpSessionFactory {
    #[must_use]
    pub const fn new(endpoint: Url, request_timeout: Option<Duration>) -> Self {
        Self {
            endpoint,
            request_timeout,
        }
    }
}

impl SessionFactory for HttpSessionFactory {
    fn open(&self, concurrency: usize) -> AppResult<Arc<dyn CompletionSession>> {
        let mut builder = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(concurrency);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = match builder.build() {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to build HTTP client: {}", e);
                return Err(AppError::http(HttpError::BuildClientFailed { source: e }));
            }
        };
        Ok(Arc::new(HttpSession {
            client,
            endpoint: self.endpoint.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    endpoint: Url,
}

#[async_trait]
impl CompletionSession for HttpSession {
    async fn stream_completion(&self, spec: &RequestSpec) -> Result<StreamTiming, RequestFailure> {
        read_stream(&self.client, &self.endpoint, spec).await
    }
}
