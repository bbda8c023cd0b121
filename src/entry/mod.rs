mod plan;

use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::BenchArgs;
use crate::config::DEFAULT_CONFIG_FILES;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

/// Parses the command line, then runs the sweep on a multi-threaded runtime.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, or when
/// the sweep cannot start or its results cannot be written.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(BenchArgs, ArgMatches)>> {
    let mut cmd = BenchArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = BenchArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: BenchArgs, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(args, matches).inspect_err(|err| {
        if err.is_config_failure() {
            tracing::error!("Configuration rejected, no requests sent: {}", err);
        }
    })?;
    execute_plan(plan).await
}
