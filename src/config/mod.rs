//! Configuration loading and application.
mod apply;
mod loader;
mod resolve;
pub mod types;


pub use apply::{apply_config, select_server};
pub use loader::load_config;
pub use resolve::BenchConfig;

pub(crate) use loader::DEFAULT_CONFIG_FILES;
