//! Tracing setup for the CLI.
//!
//! Level selection, first match wins:
//! 1. `--verbose` - debug for snapbuild crates
//! 2. `--quiet` - errors only
//! 3. `RUST_LOG`
//! 4. info for snapbuild crates
//!
//! The bundler's `Build success` / `Build error` lines are info and error
//! events, so `--quiet` keeps only failures.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "snapbuild_bundler=debug,snapbuild_cli=debug";
const QUIET_FILTER: &str = "snapbuild_bundler=error,snapbuild_cli=error";
const DEFAULT_FILTER: &str = "snapbuild_bundler=info,snapbuild_cli=info";

/// Pick the filter directives for the given flags.
pub fn filter_directives(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some(VERBOSE_FILTER)
    } else if quiet {
        Some(QUIET_FILTER)
    } else {
        None
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// ```rust,no_run
/// use snapbuild_cli::logger::init_logger;
///
/// init_logger(false, false, false);
/// tracing::info!("ready");
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = match filter_directives(verbose, quiet) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    init_logger_with_filter(filter, no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .without_time()
        .compact();

    // A subscriber may already be set, e.g. by a test harness.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
