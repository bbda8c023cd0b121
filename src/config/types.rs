use std::time::Duration;

use serde::Deserialize;

use crate::args::{ConcurrencyLevels, OutputFormat};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub concurrency: Option<ConcurrencyValue>,
    #[serde(alias = "trials")]
    pub runs: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub no_timeout: Option<bool>,
    pub continuous: Option<bool>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub no_color: Option<bool>,
    pub servers: Option<Vec<ServerConfig>>,
}

/// One endpoint selectable by the `SERVER` ordinal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub name: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConcurrencyValue {
    List(Vec<usize>),
    Text(String),
}

impl ConcurrencyValue {
    pub(crate) fn to_levels(&self) -> Result<ConcurrencyLevels, ValidationError> {
        match self {
            ConcurrencyValue::List(values) => ConcurrencyLevels::from_values(values),
            ConcurrencyValue::Text(text) => text.parse(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => crate::args::parsers::parse_duration(text),
        }
    }
}
