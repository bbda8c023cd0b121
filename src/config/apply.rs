use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BenchArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, ServerConfig};

/// Applies configuration values to CLI arguments.
///
/// Values given explicitly on the command line always win.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each other.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if config.timeout.is_some() && config.no_timeout == Some(true) {
        return Err(AppError::config(ConfigError::Conflict {
            left: "timeout",
            right: "no_timeout",
        }));
    }

    if !endpoint_from_cli(matches)
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "host")
        && let Some(host) = config.host.clone()
    {
        args.host = host;
    }

    if !is_cli(matches, "port")
        && let Some(port) = config.port
    {
        args.port = port;
    }

    if !is_cli(matches, "path")
        && let Some(path) = config.path.clone()
    {
        args.path = path;
    }

    if !is_cli(matches, "model")
        && let Some(model) = config.model.clone()
    {
        args.model = Some(model);
    }

    if !is_cli(matches, "prompt")
        && let Some(prompt) = config.prompt.clone()
    {
        args.prompt = prompt;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency.as_ref()
    {
        args.concurrency = concurrency
            .to_levels()
            .map_err(|err| AppError::config(ConfigError::InvalidConcurrency { source: err }))?;
    }

    if !is_cli(matches, "runs")
        && let Some(runs) = config.runs
    {
        args.runs = ensure_positive_usize(runs, "runs")?;
    }

    if !is_cli(matches, "request_timeout")
        && !is_cli(matches, "no_timeout")
    {
        if let Some(timeout) = config.timeout.as_ref() {
            args.request_timeout = timeout
                .to_duration()
                .map_err(|err| AppError::config(ConfigError::InvalidTimeout { source: err }))?;
        }
        if let Some(no_timeout) = config.no_timeout {
            args.no_timeout = no_timeout;
        }
    }

    if !is_cli(matches, "continuous")
        && let Some(continuous) = config.continuous
    {
        args.continuous = continuous;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

/// Resolves the `SERVER` ordinal against the configured server list.
///
/// The selected entry supplies `url` and `model` unless they were passed on
/// the command line. Any of `--url`, `--host` or `--port` on the command line
/// keeps the entry's `url` out.
///
/// # Errors
///
/// Returns an error when the ordinal is out of range or the entry has no URL.
pub fn select_server(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    servers: &[ServerConfig],
) -> AppResult<()> {
    let Some(ordinal) = args.server else {
        return Ok(());
    };
    let index = ordinal.get().saturating_sub(1);
    let server = servers.get(index).ok_or_else(|| {
        AppError::validation(ValidationError::ServerOrdinalOutOfRange {
            ordinal: ordinal.get(),
            available: servers.len(),
        })
    })?;

    if !endpoint_from_cli(matches) {
        let url = server
            .url
            .clone()
            .ok_or_else(|| AppError::config(ConfigError::ServerMissingUrl { index: ordinal.get() }))?;
        args.url = Some(url);
    }
    if !is_cli(matches, "model")
        && let Some(model) = server.model.clone()
    {
        args.model = Some(model);
    }

    if let Some(name) = server.name.as_deref() {
        tracing::info!("Selected server {} ({})", ordinal.get(), name);
    }
    Ok(())
}

/// An endpoint named on the command line, in any form, beats a config `url`.
fn endpoint_from_cli(matches: &ArgMatches) -> bool {
    ["url", "host", "port"]
        .into_iter()
        .any(|name| is_cli(matches, name))
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
