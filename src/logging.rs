//! Logging setup for the ctgrzr binary.
//!
//! Library code only emits `tracing` events. The binary decides where they go by
//! installing a subscriber here; tests can install their own scoped one instead.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive, e.g. `CTGRZR_LOG=debug`.
pub const LOG_ENV: &str = "CTGRZR_LOG";

/// Log level requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Build the filter: `CTGRZR_LOG` when set and valid, otherwise the verbosity level.
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()))
}

/// Send log events to stderr. Calling it again is a no-op.
pub fn init_logging(verbosity: Verbosity) {
    let _ = fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
