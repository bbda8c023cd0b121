use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_COMPLETIONS_PATH, DEFAULT_CONCURRENCY_LEVELS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_PROMPT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TRIALS,
};
use super::parsers::{parse_concurrency_list, parse_duration_arg, parse_positive_usize};
use super::types::{ConcurrencyLevels, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async concurrency-sweep benchmark for streaming LLM completion endpoints."
)]
pub struct BenchArgs {
    /// Single concurrency level to test (overrides --concurrency)
    #[arg(value_name = "CONCURRENCY", value_parser = parse_positive_usize)]
    pub concurrency_override: Option<PositiveUsize>,

    /// Server to benchmark, as a 1-based index into the config's `servers`
    #[arg(value_name = "SERVER", value_parser = parse_positive_usize)]
    pub server: Option<PositiveUsize>,

    /// Endpoint base URL (scheme://host:port); overrides --host/--port
    #[arg(long, short)]
    pub url: Option<String>,

    /// Endpoint host, used when --url is not set
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Endpoint port, used when --url is not set
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Completions route appended to the base URL
    #[arg(long, default_value = DEFAULT_COMPLETIONS_PATH)]
    pub path: String,

    /// Model identifier sent with every request
    #[arg(long, short)]
    pub model: Option<String>,

    /// Prompt sent with every request
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Concurrency levels to sweep (comma-separated)
    #[arg(
        long,
        short,
        default_value = DEFAULT_CONCURRENCY_LEVELS,
        value_parser = parse_concurrency_list
    )]
    pub concurrency: ConcurrencyLevels,

    /// Trials (runs) per concurrency level
    #[arg(long, short, default_value = DEFAULT_TRIALS, value_parser = parse_positive_usize)]
    pub runs: PositiveUsize,

    /// Per-request timeout covering the whole stream (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Wait for every request indefinitely
    #[arg(long = "no-timeout", conflicts_with = "request_timeout")]
    pub no_timeout: bool,

    /// Repeat the sweep until interrupted
    #[arg(long)]
    pub continuous: bool,

    /// Report format written to stdout
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Also write the sweep report as JSON to this path
    #[arg(long, short)]
    pub output: Option<String>,

    /// Path to config file (TOML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
