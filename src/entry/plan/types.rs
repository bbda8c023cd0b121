use crate::args::OutputFormat;
use crate::config::BenchConfig;

/// Validated inputs for one invocation; built before any request is sent.
#[derive(Debug)]
pub(in crate::entry) struct SweepPlan {
    pub(super) config: BenchConfig,
    pub(super) continuous: bool,
    pub(super) output_format: OutputFormat,
    pub(super) output: Option<String>,
}
