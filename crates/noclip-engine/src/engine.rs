//! Compensation Engine - runs gatekeeper, estimator, simulator and compensator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use noclip_core::{
    CompensationState, LockSample, NoclipError, NoclipResult, AUTHORITY_DEFAULT_LOCK,
    CAST_LOCK_THRESHOLD, DEFAULT_LOCK, FIRST_SAMPLE_WEIGHT, MAX_JITTER_STEP, MAX_SIM_DELAY,
    MIN_SIM_DELAY, SMOOTHING_FACTOR, SUPPRESS_WINDOW,
};

use crate::{
    compensate, has_foreign_fingerprint, DelayEstimator, GateDecision, Gatekeeper,
    JitterSimulator, Rejection,
};

/// Engine configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Nominal lock the client applies while waiting (seconds)
    pub default_lock: f32,
    /// Default lock the authority ships, restored when disabled
    pub authority_default_lock: f32,
    /// Locks at or below this are cast locks
    pub cast_lock_threshold: f32,
    /// Lower bound of the simulated delay
    pub min_sim_delay: f32,
    /// Upper bound of the simulated delay
    pub max_sim_delay: f32,
    /// Largest random walk step per sample
    pub max_jitter_step: f32,
    /// Weight of the first response time
    pub first_sample_weight: f32,
    /// Weight of each later response time
    pub smoothing: f32,
    /// Samples skipped after a foreign lock
    pub suppress_window: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_lock: DEFAULT_LOCK,
            authority_default_lock: AUTHORITY_DEFAULT_LOCK,
            cast_lock_threshold: CAST_LOCK_THRESHOLD,
            min_sim_delay: MIN_SIM_DELAY,
            max_sim_delay: MAX_SIM_DELAY,
            max_jitter_step: MAX_JITTER_STEP,
            first_sample_weight: FIRST_SAMPLE_WEIGHT,
            smoothing: SMOOTHING_FACTOR,
            suppress_window: SUPPRESS_WINDOW,
        }
    }
}

impl EngineConfig {
    /// Check that every constant is usable by the pipeline
    pub fn validate(&self) -> NoclipResult<()> {
        let durations = [
            ("default_lock", self.default_lock),
            ("authority_default_lock", self.authority_default_lock),
            ("cast_lock_threshold", self.cast_lock_threshold),
            ("min_sim_delay", self.min_sim_delay),
            ("max_sim_delay", self.max_sim_delay),
            ("max_jitter_step", self.max_jitter_step),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(NoclipError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative duration (got {value})"
                )));
            }
        }

        if self.min_sim_delay > self.max_sim_delay {
            return Err(NoclipError::InvalidConfig(format!(
                "min_sim_delay {} exceeds max_sim_delay {}",
                self.min_sim_delay, self.max_sim_delay
            )));
        }

        let sim_span = self.max_sim_delay - self.min_sim_delay;
        if self.max_jitter_step > sim_span {
            return Err(NoclipError::InvalidConfig(format!(
                "max_jitter_step {} exceeds the simulated delay span {sim_span}",
                self.max_jitter_step
            )));
        }

        for (name, weight) in [
            ("first_sample_weight", self.first_sample_weight),
            ("smoothing", self.smoothing),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(NoclipError::InvalidConfig(format!(
                    "{name} must be within [0, 1] (got {weight})"
                )));
            }
        }

        Ok(())
    }
}

/// A computed override, plus everything needed to report it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compensation {
    /// Sample that produced this override
    pub sample: LockSample,
    pub response_time: f32,
    pub estimated_delay: f32,
    pub reduction: f32,
    pub simulated_delay: f32,
    pub spike_delay: f32,
    /// New lock value, within `[0, sample.new_lock]`
    pub override_lock: f32,
    /// Computed but not to be applied
    pub dry_run: bool,
    /// Estimated delay added by another latency tool (dry run only)
    pub foreign_delay: Option<f32>,
}

impl Compensation {
    /// Change applied to the authority's lock (never positive)
    pub fn lock_delta(&self) -> f32 {
        self.override_lock - self.sample.new_lock
    }

    /// Whether the override should be written back
    pub fn should_apply(&self) -> bool {
        !self.dry_run
    }
}

/// Outcome of one engine invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompensationOutcome {
    NoChange(Rejection),
    Override(Compensation),
}

impl CompensationOutcome {
    pub fn override_lock(&self) -> Option<f32> {
        match self {
            CompensationOutcome::Override(c) => Some(c.override_lock),
            CompensationOutcome::NoChange(_) => None,
        }
    }
}

/// Lock compensation engine
///
/// Owns the state for one enabled session. Callers must serialise
/// invocations; the engine itself holds no locks.
pub struct CompensationEngine<R = StdRng> {
    config: EngineConfig,
    gate: Gatekeeper,
    estimator: DelayEstimator,
    jitter: JitterSimulator,
    state: CompensationState,
    rng: R,
}

impl CompensationEngine<StdRng> {
    /// Create an engine with the default configuration, seeded from OS entropy
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), StdRng::from_entropy())
    }

    /// Create an engine with custom configuration, seeded from OS entropy
    pub fn with_config(config: EngineConfig) -> NoclipResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a reproducible engine
    pub fn seeded(config: EngineConfig, seed: u64) -> NoclipResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CompensationEngine<R> {
    /// Create an engine drawing jitter from `rng`
    pub fn with_rng(config: EngineConfig, rng: R) -> NoclipResult<Self> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: EngineConfig, rng: R) -> Self {
        CompensationEngine {
            gate: Gatekeeper::new(config.cast_lock_threshold, config.suppress_window),
            estimator: DelayEstimator::new(config.first_sample_weight, config.smoothing),
            jitter: JitterSimulator::new(
                config.min_sim_delay,
                config.max_sim_delay,
                config.max_jitter_step,
            ),
            state: CompensationState::new(config.min_sim_delay, config.max_sim_delay),
            config,
            rng,
        }
    }

    /// Process one lock update.
    ///
    /// Invalid durations are rejected before the state is touched.
    pub fn process(
        &mut self,
        sample: LockSample,
        dry_run: bool,
    ) -> NoclipResult<CompensationOutcome> {
        sample.validate()?;

        if let GateDecision::Reject(rejection) = self.gate.admit(&sample, &mut self.state, dry_run)
        {
            debug!(
                ?rejection,
                new_lock = sample.new_lock,
                suppress_count = self.state.suppress_count,
                "lock update not compensated"
            );
            return Ok(CompensationOutcome::NoChange(rejection));
        }

        let estimate =
            self.estimator
                .observe(&mut self.state, self.config.default_lock, sample.previous_lock);
        if estimate.response_time < 0.0 {
            warn!(
                response_time = estimate.response_time,
                previous_lock = sample.previous_lock,
                "previous lock exceeded the default lock, reduction floored at zero"
            );
        }

        let simulated_delay = self.jitter.step(&mut self.state, &mut self.rng);
        let override_lock = compensate(sample.new_lock, estimate.reduction, simulated_delay);

        let foreign_delay = (dry_run
            && sample.new_lock <= self.config.default_lock
            && has_foreign_fingerprint(sample.new_lock))
        .then(|| estimate.response_time - (self.config.default_lock - sample.new_lock));

        let compensation = Compensation {
            sample,
            response_time: estimate.response_time,
            estimated_delay: estimate.estimated_delay,
            reduction: estimate.reduction,
            simulated_delay,
            spike_delay: estimate.spike_delay,
            override_lock,
            dry_run,
            foreign_delay,
        };

        debug!(
            response_time = compensation.response_time,
            estimated_delay = compensation.estimated_delay,
            simulated_delay,
            new_lock = sample.new_lock,
            override_lock,
            dry_run,
            "lock compensated"
        );

        Ok(CompensationOutcome::Override(compensation))
    }

    /// Discard learned state, as if freshly enabled
    pub fn reset(&mut self) {
        self.state = CompensationState::new(self.config.min_sim_delay, self.config.max_sim_delay);
    }

    pub fn state(&self) -> &CompensationState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for CompensationEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CompensationEngine {
        CompensationEngine::seeded(EngineConfig::default(), 1234).unwrap()
    }

    fn sample(previous_lock: f32, new_lock: f32) -> LockSample {
        LockSample::new(previous_lock, new_lock, false).unwrap()
    }

    #[test]
    fn test_end_to_end_first_sample() {
        let mut engine = engine();

        let outcome = engine.process(sample(0.5, 0.6), false).unwrap();
        let CompensationOutcome::Override(c) = outcome else {
            panic!("expected override, got {outcome:?}");
        };

        assert!((c.response_time - 0.1).abs() < 1e-5);
        assert!((c.estimated_delay - 0.075).abs() < 1e-5);
        assert!((c.reduction - 0.075).abs() < 1e-5);
        assert!((0.042..=0.058).contains(&c.simulated_delay));
        assert!(c.override_lock > 0.0 && c.override_lock < 0.6);
        assert!((c.override_lock - (0.6 - 0.075 + c.simulated_delay)).abs() < 1e-5);
        assert!(c.should_apply());
        assert!(c.lock_delta() < 0.0);
    }

    #[test]
    fn test_cast_lock_leaves_state() {
        let mut engine = engine();
        let before = engine.state().clone();

        let outcome = engine
            .process(LockSample::new(0.5, 2.5, true).unwrap(), false)
            .unwrap();

        assert_eq!(outcome, CompensationOutcome::NoChange(Rejection::CastLock));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_foreign_lock_then_suppression() {
        let mut engine = engine();

        assert_eq!(
            engine.process(sample(0.5, 0.4005), false).unwrap(),
            CompensationOutcome::NoChange(Rejection::ForeignLock)
        );
        assert_eq!(engine.state().suppress_count, 2);

        assert_eq!(
            engine.process(sample(0.5, 0.6), false).unwrap(),
            CompensationOutcome::NoChange(Rejection::Suppressed { remaining: 1 })
        );
        assert_eq!(
            engine.process(sample(0.5, 0.6), false).unwrap(),
            CompensationOutcome::NoChange(Rejection::Suppressed { remaining: 0 })
        );
        assert!(engine
            .process(sample(0.5, 0.6), false)
            .unwrap()
            .override_lock()
            .is_some());
        assert_eq!(engine.state().estimated_delay.map(|d| d > 0.0), Some(true));
    }

    #[test]
    fn test_dry_run_reports_foreign_delay() {
        let mut engine = engine();

        let outcome = engine.process(sample(0.45, 0.5505), true).unwrap();
        let CompensationOutcome::Override(c) = outcome else {
            panic!("expected override, got {outcome:?}");
        };

        assert!(!c.should_apply());
        // response 0.15 - (0.6 - 0.5505)
        let foreign = c.foreign_delay.unwrap();
        assert!((foreign - 0.1005).abs() < 1e-5);
        assert_eq!(engine.state().suppress_count, 0);
    }

    #[test]
    fn test_invalid_sample_rejected_without_state_change() {
        let mut engine = engine();
        let before = engine.state().clone();

        let bad = LockSample {
            previous_lock: f32::NAN,
            new_lock: 0.6,
            is_casting: false,
        };

        assert!(matches!(
            engine.process(bad, false),
            Err(NoclipError::InvalidLock { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut engine = engine();
        engine.process(sample(0.5, 0.6), false).unwrap();
        assert!(engine.state().estimated_delay.is_some());

        engine.reset();
        assert_eq!(engine.state(), &CompensationState::default());
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());

        let inverted = EngineConfig {
            min_sim_delay: 0.07,
            ..EngineConfig::default()
        };
        assert!(matches!(
            CompensationEngine::seeded(inverted, 1),
            Err(NoclipError::InvalidConfig(_))
        ));

        let nan = EngineConfig {
            default_lock: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(nan.validate().is_err());

        let heavy = EngineConfig {
            smoothing: 1.5,
            ..EngineConfig::default()
        };
        assert!(heavy.validate().is_err());

        let huge_step = EngineConfig {
            max_jitter_step: f32::MAX,
            ..EngineConfig::default()
        };
        assert!(matches!(
            CompensationEngine::seeded(huge_step, 1),
            Err(NoclipError::InvalidConfig(_))
        ));

        let wide_step = EngineConfig {
            max_jitter_step: 0.03,
            ..EngineConfig::default()
        };
        assert!(wide_step.validate().is_err());

        let full_span = EngineConfig {
            max_jitter_step: 0.015,
            ..EngineConfig::default()
        };
        assert!(full_span.validate().is_ok());
    }

    use rand::RngCore;

    /// `RngCore` wrapper counting every draw
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn test_one_draw_per_override_none_per_rejection() {
        let rng = CountingRng {
            inner: StdRng::seed_from_u64(21),
            draws: 0,
        };
        let mut engine = CompensationEngine::with_rng(EngineConfig::default(), rng).unwrap();

        let script = [
            (LockSample::new(0.5, 0.6, false).unwrap(), true),
            (LockSample::new(0.5, 2.5, true).unwrap(), false),
            (LockSample::new(0.5, 0.1, false).unwrap(), false),
            (LockSample::new(0.5, 0.4005, false).unwrap(), false),
            (LockSample::new(0.5, 0.6, false).unwrap(), false),
            (LockSample::new(0.5, 0.6, false).unwrap(), false),
            (LockSample::new(0.48, 0.6, false).unwrap(), true),
        ];

        for (sample, compensable) in script {
            let before = engine.rng.draws;
            let outcome = engine.process(sample, false).unwrap();

            let expected = if compensable { 1 } else { 0 };
            assert_eq!(engine.rng.draws - before, expected, "{outcome:?}");
            assert_eq!(outcome.override_lock().is_some(), compensable);
        }
    }
}
