//! Logging setup and the tracing-backed diagnostics sink

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use noclip_engine::{Diagnostic, Severity};

use crate::{DiagnosticsSink, RuntimeError, RuntimeResult};

/// Output format for the global subscriber
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global tracing subscriber.
/// The filter comes from `RUST_LOG`, falling back to `info`.
pub fn init_logging(format: LogFormat) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|_| RuntimeError::LoggingInit)
}

/// Forwards diagnostics to `tracing` at the matching level
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => info!(target: "noclip", "{}", diagnostic.message),
            Severity::Warning => warn!(target: "noclip", "{}", diagnostic.message),
            Severity::Error => error!(target: "noclip", "{}", diagnostic.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call wins the race, a second install must be refused
        let _ = init_logging(LogFormat::Pretty);
        assert!(matches!(
            init_logging(LogFormat::Json),
            Err(RuntimeError::LoggingInit)
        ));
    }

    #[test]
    fn test_tracing_sink_accepts_all_levels() {
        let mut sink = TracingSink;
        sink.emit(Diagnostic::info("info"));
        sink.emit(Diagnostic::warning("warn"));
        sink.emit(Diagnostic::error("error"));
    }
}
