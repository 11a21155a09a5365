//! Jitter simulator - bounded random walk over the synthetic minimum delay

use rand::Rng;

use noclip_core::{CompensationState, MAX_JITTER_STEP, MAX_SIM_DELAY, MIN_SIM_DELAY};

/// Random walk standing in for local processing + next frame latency
/// INVARIANT: the walk never leaves `[min_delay, max_delay]`
#[derive(Clone, Copy, Debug)]
pub struct JitterSimulator {
    min_delay: f32,
    max_delay: f32,
    max_step: f32,
}

impl JitterSimulator {
    pub fn new(min_delay: f32, max_delay: f32, max_step: f32) -> Self {
        JitterSimulator {
            min_delay,
            max_delay,
            max_step,
        }
    }

    /// Perturb the simulated delay by one uniform step and clamp it.
    /// Draws exactly one random value.
    pub fn step<R: Rng + ?Sized>(&self, state: &mut CompensationState, rng: &mut R) -> f32 {
        let step: f32 = rng.gen_range(-self.max_step..=self.max_step);
        state.simulated_delay = (state.simulated_delay + step).clamp(self.min_delay, self.max_delay);
        state.simulated_delay
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_delay, self.max_delay)
    }
}

impl Default for JitterSimulator {
    fn default() -> Self {
        Self::new(MIN_SIM_DELAY, MAX_SIM_DELAY, MAX_JITTER_STEP)
    }
}
