//! Diagnostic logging to stderr.

use crate::context::VerbosityLevel;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `libvessel=debug`
pub const LOG_ENV: &str = "VESSEL_LOG";

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: VerbosityLevel) -> &'static str {
    match verbosity {
        VerbosityLevel::Normal => "warn",
        VerbosityLevel::Verbose => "info",
        VerbosityLevel::Debug => "debug",
        VerbosityLevel::Trace => "trace",
    }
}

/// Installs the global subscriber. `VESSEL_LOG` wins over `-v`.
pub fn init(verbosity: VerbosityLevel, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(verbosity >= VerbosityLevel::Debug)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_per_level() {
        assert_eq!(default_directive(VerbosityLevel::Normal), "warn");
        assert_eq!(default_directive(VerbosityLevel::Verbose), "info");
        assert_eq!(default_directive(VerbosityLevel::Debug), "debug");
        assert_eq!(default_directive(VerbosityLevel::Trace), "trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(VerbosityLevel::Normal, false);
        init(VerbosityLevel::Debug, false);
    }
}
