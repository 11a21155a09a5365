//! Delay estimator for passive network + server latency tracking

use noclip_core::CompensationState;

/// Result of feeding one response time into the estimator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayEstimate {
    /// Default lock minus the lock the client was still showing
    pub response_time: f32,
    /// Smoothed delay after this sample
    pub estimated_delay: f32,
    /// Latency credited back to the player, never above `response_time`
    pub reduction: f32,
    /// Part of the response time not covered by the reduction
    pub spike_delay: f32,
}

/// Exponential smoothing over observed response times
#[derive(Clone, Copy, Debug)]
pub struct DelayEstimator {
    /// Weight of the first response time while the estimate is unset
    first_sample_weight: f32,
    /// Weight of each new response time once the estimate exists
    smoothing: f32,
}

impl DelayEstimator {
    pub fn new(first_sample_weight: f32, smoothing: f32) -> Self {
        DelayEstimator {
            first_sample_weight,
            smoothing,
        }
    }

    /// Fold a response time into the state and compute the reduction.
    ///
    /// A negative response time (the previous lock already ran past the
    /// default) is reported as-is but smoothed as zero, and the reduction
    /// is floored at zero so a compensation can never add delay.
    pub fn observe(
        &self,
        state: &mut CompensationState,
        default_lock: f32,
        previous_lock: f32,
    ) -> DelayEstimate {
        let response_time = default_lock - previous_lock;
        let observed = response_time.max(0.0);

        let estimated_delay = match state.estimated_delay {
            Some(delay) => delay * (1.0 - self.smoothing) + observed * self.smoothing,
            None => observed * self.first_sample_weight,
        };
        state.estimated_delay = Some(estimated_delay);

        let reduction = estimated_delay.min(response_time).max(0.0);

        DelayEstimate {
            response_time,
            estimated_delay,
            reduction,
            spike_delay: response_time - reduction,
        }
    }
}

impl Default for DelayEstimator {
    fn default() -> Self {
        Self::new(noclip_core::FIRST_SAMPLE_WEIGHT, noclip_core::SMOOTHING_FACTOR)
    }
}
