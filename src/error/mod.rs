mod app;
mod config;
mod http;
mod request;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use request::RequestFailure;
pub use validation::ValidationError;
