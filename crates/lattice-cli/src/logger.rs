//! Logging setup for the Lattice CLI.
//!
//! Library crates only emit `tracing` events; this module installs the one
//! subscriber that prints them to stderr.
//!
//! # Example
//!
//! ```rust,no_run
//! use lattice_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Loading policy");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "lattice_cli=debug,lattice_config=debug,lattice_rules=debug,lattice_graph=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "lattice_cli=info,lattice_config=warn,lattice_rules=warn,lattice_graph=warn";

/// Initialize the tracing subscriber.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: debug for every lattice crate
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the CLI, warnings for the libraries
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether stderr should get ANSI colors.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; without either, colors follow terminal
/// detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
