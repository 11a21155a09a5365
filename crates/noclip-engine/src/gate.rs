//! Gatekeeper - decides whether a lock update may be compensated

use noclip_core::{
    CompensationState, LockSample, CAST_LOCK_THRESHOLD, FINGERPRINT_BAND_US,
    FINGERPRINT_PERIOD_US, SUPPRESS_WINDOW,
};

/// Why a sample was left untouched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Cast lock (caster tax, teleport, limit break), never shortened
    CastLock,
    /// Lock carries another latency tool's fingerprint; suppression armed
    ForeignLock,
    /// Inside the suppression window; `remaining` samples still to skip
    Suppressed { remaining: u8 },
}

/// Gatekeeper verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Reject(Rejection),
}

/// Classifies samples before estimation
#[derive(Clone, Copy, Debug)]
pub struct Gatekeeper {
    cast_lock_threshold: f32,
    suppress_window: u8,
}

impl Gatekeeper {
    pub fn new(cast_lock_threshold: f32, suppress_window: u8) -> Self {
        Gatekeeper {
            cast_lock_threshold,
            suppress_window,
        }
    }

    /// Classify a sample. Cast locks leave the state untouched; the
    /// fingerprint check is skipped in dry run so the lock can be reported.
    pub fn admit(
        &self,
        sample: &LockSample,
        state: &mut CompensationState,
        dry_run: bool,
    ) -> GateDecision {
        if sample.is_casting || sample.new_lock <= self.cast_lock_threshold {
            return GateDecision::Reject(Rejection::CastLock);
        }

        if !dry_run && has_foreign_fingerprint(sample.new_lock) {
            state.arm_suppression(self.suppress_window);
            return GateDecision::Reject(Rejection::ForeignLock);
        }

        match state.consume_suppression() {
            Some(remaining) => GateDecision::Reject(Rejection::Suppressed { remaining }),
            None => GateDecision::Proceed,
        }
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new(CAST_LOCK_THRESHOLD, SUPPRESS_WINDOW)
    }
}

/// Whether `lock mod 10ms` falls inside the foreign tool band.
///
/// The lock is quantised to whole microseconds first: an f32 such as
/// 0.4005 is stored as 0.40049999..., and a raw float modulo would land
/// just under the band edge.
pub fn has_foreign_fingerprint(lock: f32) -> bool {
    let micros = (lock as f64 * 1_000_000.0).round() as i64;
    let remainder = micros.rem_euclid(FINGERPRINT_PERIOD_US);
    (FINGERPRINT_BAND_US.0..=FINGERPRINT_BAND_US.1).contains(&remainder)
}
