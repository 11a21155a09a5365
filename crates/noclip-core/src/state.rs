//! Compensation state carried across samples for one enabled session

use crate::{MAX_SIM_DELAY, MIN_SIM_DELAY};

/// Persistent compensation state
///
/// INVARIANT: `simulated_delay` stays inside the simulator bounds and
/// `suppress_count` never exceeds the suppression window.
#[derive(Clone, Debug, PartialEq)]
pub struct CompensationState {
    /// Smoothed network + server delay, `None` until the first compensable sample.
    /// A negative response time is smoothed in as zero, so this never goes negative;
    /// the raw value is still reported on the compensation.
    pub estimated_delay: Option<f32>,
    /// Synthetic minimum delay (seconds)
    pub simulated_delay: f32,
    /// Remaining samples to force-ignore after a foreign lock fingerprint
    pub suppress_count: u8,
}

impl CompensationState {
    /// Fresh state with the simulated delay at the midpoint of `[min, max]`
    pub fn new(min_sim_delay: f32, max_sim_delay: f32) -> Self {
        CompensationState {
            estimated_delay: None,
            simulated_delay: (max_sim_delay - min_sim_delay) / 2.0 + min_sim_delay,
            suppress_count: 0,
        }
    }

    /// Start a suppression window of `window` samples
    pub fn arm_suppression(&mut self, window: u8) {
        self.suppress_count = window;
    }

    /// Consume one suppressed sample.
    /// Returns the remaining count, or `None` if nothing was suppressed.
    pub fn consume_suppression(&mut self) -> Option<u8> {
        if self.suppress_count == 0 {
            return None;
        }
        self.suppress_count -= 1;
        Some(self.suppress_count)
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppress_count > 0
    }
}

impl Default for CompensationState {
    fn default() -> Self {
        Self::new(MIN_SIM_DELAY, MAX_SIM_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = CompensationState::default();
        assert_eq!(state.estimated_delay, None);
        assert!((state.simulated_delay - 0.05).abs() < 1e-6);
        assert_eq!(state.suppress_count, 0);
    }

    #[test]
    fn test_suppression_countdown() {
        let mut state = CompensationState::default();
        assert_eq!(state.consume_suppression(), None);

        state.arm_suppression(2);
        assert!(state.is_suppressing());
        assert_eq!(state.consume_suppression(), Some(1));
        assert_eq!(state.consume_suppression(), Some(0));
        assert_eq!(state.consume_suppression(), None);
        assert!(!state.is_suppressing());
    }
}
