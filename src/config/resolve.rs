use std::time::Duration;

use url::Url;

use crate::args::{BenchArgs, ConcurrencyLevels, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

/// Fully validated benchmark inputs.
///
/// Built once before any request is dispatched; every malformed value
/// surfaces here as a validation error.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub endpoint: Url,
    pub model: String,
    pub prompt: String,
    pub levels: ConcurrencyLevels,
    pub trials: PositiveUsize,
    /// `None` waits on every request indefinitely.
    pub request_timeout: Option<Duration>,
}

impl BenchConfig {
    /// Validates CLI arguments (already merged with config) into a run config.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint, model, or prompt is invalid.
    pub fn from_args(args: &BenchArgs) -> AppResult<Self> {
        let base = args
            .url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", args.host, args.port));
        let endpoint = resolve_endpoint(&base, &args.path)?;

        let model = args
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingModel))?
            .to_owned();

        if args.prompt.trim().is_empty() {
            return Err(AppError::validation(ValidationError::PromptEmpty));
        }

        let levels = args
            .concurrency_override
            .map_or_else(|| args.concurrency.clone(), ConcurrencyLevels::single);

        let request_timeout = if args.no_timeout {
            None
        } else {
            Some(args.request_timeout)
        };

        Ok(Self {
            endpoint,
            model,
            prompt: args.prompt.clone(),
            levels,
            trials: args.runs,
            request_timeout,
        })
    }
}

/// Joins the base URL and the completions route, keeping any base path prefix.
pub(crate) fn resolve_endpoint(base: &str, path: &str) -> AppResult<Url> {
    let trimmed = base.trim().trim_end_matches('/');
    let route = path.trim();
    let joined = if route.is_empty() {
        trimmed.to_owned()
    } else if route.starts_with('/') {
        format!("{}{}", trimmed, route)
    } else {
        format!("{}/{}", trimmed, route)
    };

    let url = Url::parse(&joined).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: joined.clone(),
            source: err,
        })
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::validation(ValidationError::UnsupportedScheme {
            url: joined,
        }));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost {
            url: joined,
        }));
    }
    Ok(url)
}
