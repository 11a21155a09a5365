//! Diagnostics - human readable trace of each decision
//!
//! All durations are rendered in whole milliseconds, truncated toward zero.

use std::fmt;

use noclip_core::{secs_to_ms, LockSample};

use crate::{Compensation, CompensationOutcome, Rejection};

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single message for the diagnostics sink
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Describe why a sample was left alone
    pub fn for_rejection(rejection: Rejection, sample: &LockSample) -> Self {
        match rejection {
            Rejection::CastLock => Diagnostic::info(format!(
                "Ignored reducing server cast lock of {} ms",
                secs_to_ms(sample.new_lock)
            )),
            Rejection::ForeignLock => Diagnostic::error(format!(
                "Unexpected lock of {} ms",
                secs_to_ms(sample.new_lock)
            )),
            Rejection::Suppressed { remaining } => Diagnostic::warning(format!(
                "Detected possible use of another latency tool, skipping ({remaining} left)"
            )),
        }
    }

    /// Describe a computed override
    pub fn for_compensation(compensation: &Compensation) -> Self {
        Diagnostic::info(compensation.to_string())
    }

    pub fn for_outcome(outcome: &CompensationOutcome, sample: &LockSample) -> Self {
        match outcome {
            CompensationOutcome::NoChange(rejection) => Self::for_rejection(*rejection, sample),
            CompensationOutcome::Override(compensation) => Self::for_compensation(compensation),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// `[DRY] Response: R (E) > S+P (S + P) ms || Lock: L > O (D) ms`
impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "[DRY] ")?;
        }
        write!(
            f,
            "Response: {} ({}) > {} ({} + {}) ms",
            secs_to_ms(self.response_time),
            secs_to_ms(self.estimated_delay),
            secs_to_ms(self.simulated_delay + self.spike_delay),
            secs_to_ms(self.simulated_delay),
            secs_to_ms(self.spike_delay),
        )?;
        if let Some(foreign) = self.foreign_delay {
            write!(f, " [Foreign tool: {} ms]", secs_to_ms(foreign))?;
        }
        write!(
            f,
            " || Lock: {} > {} ({}) ms",
            secs_to_ms(self.sample.new_lock),
            secs_to_ms(self.override_lock),
            secs_to_ms(self.lock_delta()),
        )
    }
}
