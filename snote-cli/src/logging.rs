//! Logging setup for the snote CLI
//!
//! Diagnostics go to stderr so that listings on stdout stay clean. The
//! subscriber is handed back to the caller, which scopes it around the
//! command with [`tracing::subscriber::with_default`].

use tracing::level_filters::LevelFilter;
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;

/// Enables debug logging when set to a non-empty value
pub const DEBUG_ENV_VAR: &str = "SNOTE_DEBUG";

/// Fine-grained filter directives, e.g. `snote=trace`
pub const FILTER_ENV_VAR: &str = "SNOTE_LOG";

/// Pick the log level from the command-line flags.
///
/// `--quiet` wins over everything; debug (flag or environment) wins over
/// `--verbose`.
pub fn log_level(quiet: bool, debug: bool, verbose: bool, debug_env: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug || debug_env {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::WARN
    }
}

/// True when [`DEBUG_ENV_VAR`] is set to something
pub fn debug_env_enabled() -> bool {
    std::env::var_os(DEBUG_ENV_VAR).is_some_and(|value| !value.is_empty())
}

/// Build a stderr subscriber at `level`; [`FILTER_ENV_VAR`] may refine it
pub fn subscriber(level: Level) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .with_env_var(FILTER_ENV_VAR)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .finish()
}
