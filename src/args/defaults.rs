pub(crate) const DEFAULT_USER_AGENT: &str = concat!("llmsweep/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 8000;
/// OpenAI-compatible completions route served by vLLM and friends.
pub(crate) const DEFAULT_COMPLETIONS_PATH: &str = "/v1/completions";
pub(crate) const DEFAULT_PROMPT: &str = "100 word story about balloons";
pub(crate) const DEFAULT_CONCURRENCY_LEVELS: &str = "1,5,10,20";
pub(crate) const DEFAULT_TRIALS: &str = "3";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "10m";
