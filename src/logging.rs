//! Tracing setup for the CLI.
//!
//! Diagnostics go to stderr so the summaries printed by [`crate::output`]
//! stay the only thing on stdout. `RUST_LOG` overrides the CLI verbosity.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings, e.g. a failed QR or a skipped layout block.
    #[default]
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// Map `-q` and repeated `-v` flags to a verbosity.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("travel_book={}", verbosity.to_level_filter());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Warn-level subscriber routed through the test harness's captured output.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
