use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Variables consulted for a filter directive, first match wins.
const FILTER_VARS: [&str; 2] = ["LLMSWEEP_LOG", "RUST_LOG"];

/// Installs the global subscriber. Logs go to stderr so stdout stays clean
/// for the report.
pub fn init_logging(verbose: bool, no_color: bool) {
    let from_env = FILTER_VARS
        .into_iter()
        .find_map(|name| std::env::var(name).ok());
    let filter = EnvFilter::try_new(filter_directive(from_env.as_deref(), verbose))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(None, verbose)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// An explicit directive is used as given; otherwise the sweep logs at
/// `info` (or `debug` when verbose) and the HTTP stack stays at `warn`.
fn filter_directive(from_env: Option<&str>, verbose: bool) -> String {
    match from_env {
        Some(directive) if !directive.trim().is_empty() => directive.to_owned(),
        _ => {
            let level = if verbose { "debug" } else { "info" };
            format!("{level},hyper=warn,reqwest=warn")
        }
    }
}
