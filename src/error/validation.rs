use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Concurrency list must not be empty.")]
    ConcurrencyListEmpty,
    #[error("Invalid concurrency list '{value}': entry {index} is empty.")]
    ConcurrencyEntryEmpty { value: String, index: usize },
    #[error("Invalid concurrency level '{entry}': {source}")]
    InvalidConcurrencyLevel {
        entry: String,
        #[source]
        source: Box<ValidationError>,
    },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL '{url}' is missing a host.")]
    UrlMissingHost { url: String },
    #[error("URL '{url}' must use http or https.")]
    UnsupportedScheme { url: String },
    #[error("Missing model (set --model or provide it in config).")]
    MissingModel,
    #[error("Prompt must not be empty.")]
    PromptEmpty,
    #[error("Server ordinal {ordinal} is out of range (config lists {available} server(s)).")]
    ServerOrdinalOutOfRange { ordinal: usize, available: usize },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
