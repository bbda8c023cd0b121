use clap::ArgMatches;

use crate::args::BenchArgs;
use crate::config::{BenchConfig, apply_config, load_config, select_server};
use crate::error::AppResult;

use super::types::SweepPlan;

pub(crate) fn build_plan(mut args: BenchArgs, matches: &ArgMatches) -> AppResult<SweepPlan> {
    let file = load_config(args.config.as_deref())?;
    if let Some(file) = file.as_ref() {
        apply_config(&mut args, matches, file)?;
    }
    let servers = file
        .as_ref()
        .and_then(|file| file.servers.as_deref())
        .unwrap_or_default();
    select_server(&mut args, matches, servers)?;

    let config = BenchConfig::from_args(&args)?;

    Ok(SweepPlan {
        config,
        continuous: args.continuous,
        output_format: args.output_format,
        output: args.output,
    })
}
