//! Timing constants shared by the engine and the runtime
//!
//! All durations are in seconds unless the name says otherwise.

/// Default lock the client applies locally while it waits for the authority.
/// Matches the authority's own nominal lock so response times are comparable.
pub const DEFAULT_LOCK: f32 = 0.6;

/// Default lock the authority ships to unmodified clients
pub const AUTHORITY_DEFAULT_LOCK: f32 = 0.5;

/// Locks at or below this value are cast locks (caster tax, teleport, limit break)
pub const CAST_LOCK_THRESHOLD: f32 = 0.11;

/// Lower bound of the simulated local processing + next frame delay
pub const MIN_SIM_DELAY: f32 = 0.04;

/// Upper bound of the simulated local processing + next frame delay
pub const MAX_SIM_DELAY: f32 = 0.06;

/// Largest random walk step applied to the simulated delay per sample
pub const MAX_JITTER_STEP: f32 = 0.008;

/// Weight of the very first response time when the estimate is still unset
pub const FIRST_SAMPLE_WEIGHT: f32 = 0.75;

/// Exponential smoothing factor applied to new response times
pub const SMOOTHING_FACTOR: f32 = 0.5;

/// Number of samples ignored after a foreign lock fingerprint is seen
pub const SUPPRESS_WINDOW: u8 = 2;

/// Fingerprint period, in microseconds (locks are issued on a 10 ms grid)
pub const FINGERPRINT_PERIOD_US: i64 = 10_000;

/// Inclusive band of the sub-period remainder that marks a foreign tool, in microseconds
pub const FINGERPRINT_BAND_US: (i64, i64) = (500, 9_500);

/// Convert seconds to whole milliseconds, truncating toward zero
pub fn secs_to_ms(secs: f32) -> i32 {
    (secs * 1000.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ms_truncates() {
        assert_eq!(secs_to_ms(0.6), 600);
        assert_eq!(secs_to_ms(0.0759), 75);
        assert_eq!(secs_to_ms(-0.0259), -25);
    }

    #[test]
    fn test_sim_bounds_ordered() {
        assert!(MIN_SIM_DELAY < MAX_SIM_DELAY);
        assert!(MAX_JITTER_STEP < MAX_SIM_DELAY - MIN_SIM_DELAY);
    }
}
