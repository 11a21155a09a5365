//! Lock Simulator - replays whole sessions against a latency profile
//!
//! Each simulated action:
//! 1. Client locks itself for the default lock
//! 2. The authority answers after one sampled response time
//! 3. The session compensates the authority's lock
//! 4. Time until the next action is response time + final lock

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use noclip_core::DEFAULT_LOCK;
use noclip_engine::{CompensationOutcome, Rejection};
use noclip_runtime::{Configuration, RuntimeError, Session, SessionConfig};

use crate::{LatencyProfile, RecordingSink, SimulatedClient};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Simulation configuration
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of actions to simulate
    pub actions: usize,
    /// Latency seen by the client
    pub profile: LatencyProfile,
    /// Lock issued for ordinary actions
    pub server_lock: f32,
    /// Lock issued for casts
    pub cast_lock: f32,
    /// Probability an action is a cast
    pub cast_ratio: f64,
    /// Probability another latency tool rewrote the lock
    pub foreign_ratio: f64,
    /// Compute overrides without applying them
    pub dry_run: bool,
    /// Log every decision
    pub logging: bool,
    /// Seed for both the latency profile and the engine
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            actions: 500,
            profile: LatencyProfile::default(),
            server_lock: DEFAULT_LOCK,
            cast_lock: 0.1,
            cast_ratio: 0.0,
            foreign_ratio: 0.0,
            dry_run: false,
            logging: false,
            seed: 0x5eed,
        }
    }
}

/// Aggregate results of one run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub actions: usize,
    pub compensated: usize,
    pub cast_locks: usize,
    pub foreign_locks: usize,
    pub suppressed: usize,
    /// Sum of response time + authority lock (seconds)
    pub baseline_time: f64,
    /// Sum of response time + lock actually served (seconds)
    pub served_time: f64,
    pub min_override: Option<f32>,
    pub max_override: Option<f32>,
    /// Smallest and largest simulated delay observed
    pub sim_delay_range: Option<(f32, f32)>,
}

impl SimulationReport {
    /// Total lock time removed (seconds)
    pub fn saved_time(&self) -> f64 {
        self.baseline_time - self.served_time
    }

    /// Mean lock time removed per compensated action (seconds)
    pub fn mean_saved(&self) -> f64 {
        if self.compensated == 0 {
            return 0.0;
        }
        self.saved_time() / self.compensated as f64
    }

    fn record_override(&mut self, lock: f32, simulated_delay: f32) {
        self.compensated += 1;
        self.min_override = Some(self.min_override.map_or(lock, |m| m.min(lock)));
        self.max_override = Some(self.max_override.map_or(lock, |m| m.max(lock)));
        self.sim_delay_range = Some(match self.sim_delay_range {
            Some((lo, hi)) => (lo.min(simulated_delay), hi.max(simulated_delay)),
            None => (simulated_delay, simulated_delay),
        });
    }
}

/// Drives a session through simulated actions
pub struct LockSimulator {
    config: SimulationConfig,
    session: Session<SimulatedClient, RecordingSink>,
    rng: StdRng,
}

impl LockSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        for (name, ratio) in [
            ("cast_ratio", config.cast_ratio),
            ("foreign_ratio", config.foreign_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name} must be within [0, 1] (got {ratio})"
                )));
            }
        }

        let session = Session::with_config(
            SessionConfig {
                seed: Some(config.seed),
                ..SessionConfig::default()
            },
            Configuration {
                enabled: true,
                enable_logging: config.logging,
                enable_dry_run: config.dry_run,
            },
            SimulatedClient::new(),
            RecordingSink::default(),
        )?;

        Ok(LockSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            session,
        })
    }

    /// Run every configured action
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        let mut report = SimulationReport::default();
        for _ in 0..self.config.actions {
            self.step(&mut report)?;
        }
        Ok(report)
    }

    /// Simulate one action
    pub fn step(&mut self, report: &mut SimulationReport) -> Result<(), SimulationError> {
        let is_casting = self.rng.gen_bool(self.config.cast_ratio);
        let foreign = !is_casting && self.rng.gen_bool(self.config.foreign_ratio);

        let new_lock = if is_casting {
            self.config.cast_lock
        } else if foreign {
            // Another tool shaves a sub-10ms amount off the lock
            self.config.server_lock - self.rng.gen_range(0.001f32..0.009)
        } else {
            self.config.server_lock
        };

        let response_time = self.config.profile.sample(&mut self.rng);
        let client = self.session.effector_mut();
        client.begin_action();
        client.advance(response_time);
        let previous_lock = client.receive_lock(new_lock);

        let outcome = self.session.observe(previous_lock, new_lock, is_casting)?;

        report.actions += 1;
        match outcome {
            Some(CompensationOutcome::Override(c)) => {
                report.record_override(c.override_lock, c.simulated_delay)
            }
            Some(CompensationOutcome::NoChange(Rejection::CastLock)) => report.cast_locks += 1,
            Some(CompensationOutcome::NoChange(Rejection::ForeignLock)) => {
                report.foreign_locks += 1
            }
            Some(CompensationOutcome::NoChange(Rejection::Suppressed { .. })) => {
                report.suppressed += 1
            }
            None => {}
        }

        let served_lock = self.session.effector().lock;
        report.baseline_time += (response_time + new_lock) as f64;
        report.served_time += (response_time + served_lock) as f64;
        Ok(())
    }

    pub fn session(&self) -> &Session<SimulatedClient, RecordingSink> {
        &self.session
    }
}
