//! Session - enable/disable lifecycle around one compensation engine

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use noclip_core::{CompensationState, LockSample};
use noclip_engine::{CompensationEngine, CompensationOutcome, Diagnostic, EngineConfig, Severity};

use crate::{
    Command, ConfigFile, Configuration, DiagnosticsSink, Effector, RuntimeResult, SampleSource,
};

/// Session configuration
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Engine constants
    pub engine: EngineConfig,
    /// Fixed jitter seed; `None` seeds every engine from OS entropy
    pub seed: Option<u64>,
}

/// Session shared between the interception thread and the command thread
pub type SharedSession<E, D> = Arc<Mutex<Session<E, D>>>;

/// Runtime session
///
/// The engine (and its learned state) exists only while enabled.
pub struct Session<E: Effector, D: DiagnosticsSink> {
    /// Session configuration
    config: SessionConfig,
    /// User toggles
    user: Configuration,
    /// Where `user` is persisted, if anywhere
    store: Option<ConfigFile>,
    /// Engine for the current enabled period
    engine: Option<CompensationEngine>,
    /// Number of engines created, mixed into a fixed seed
    generation: u64,
    effector: E,
    sink: D,
}

impl<E: Effector, D: DiagnosticsSink> Session<E, D> {
    /// Disabled session with default configuration
    pub fn new(effector: E, sink: D) -> Self {
        Session {
            config: SessionConfig::default(),
            user: Configuration::default(),
            store: None,
            engine: None,
            generation: 0,
            effector,
            sink,
        }
    }

    /// Session starting from `user`; enabled immediately if `user.enabled`
    pub fn with_config(
        config: SessionConfig,
        user: Configuration,
        effector: E,
        sink: D,
    ) -> RuntimeResult<Self> {
        config.engine.validate()?;

        let enabled = user.enabled;
        let mut session = Session {
            config,
            user,
            store: None,
            engine: None,
            generation: 0,
            effector,
            sink,
        };
        if enabled {
            session.activate()?;
        }
        Ok(session)
    }

    /// Session loaded from (and persisting to) `store`
    pub fn from_store(
        config: SessionConfig,
        store: ConfigFile,
        effector: E,
        sink: D,
    ) -> RuntimeResult<Self> {
        let user = store.load()?;
        let mut session = Self::with_config(config, user, effector, sink)?;
        session.store = Some(store);
        Ok(session)
    }

    pub fn into_shared(self) -> SharedSession<E, D> {
        Arc::new(Mutex::new(self))
    }

    /// Enable compensation with a fresh engine
    pub fn enable(&mut self) -> RuntimeResult<()> {
        if self.engine.is_none() {
            self.activate()?;
        }
        self.user.enabled = true;
        self.persist()
    }

    /// Disable compensation and discard the learned state
    pub fn disable(&mut self) -> RuntimeResult<()> {
        self.deactivate();
        self.user.enabled = false;
        self.persist()
    }

    /// Apply a command, returning the text to echo back
    pub fn execute(&mut self, command: Command) -> RuntimeResult<String> {
        let echo = match command {
            Command::On => {
                self.enable()?;
                "Enabled!".to_string()
            }
            Command::Off => {
                self.disable()?;
                "Disabled!".to_string()
            }
            Command::Toggle if self.is_enabled() => {
                self.disable()?;
                "Disabled!".to_string()
            }
            Command::Toggle => {
                self.enable()?;
                "Enabled!".to_string()
            }
            Command::ToggleLogging => {
                self.user.enable_logging = !self.user.enable_logging;
                self.persist()?;
                format!("Logging is now {}.", on_off(self.user.enable_logging))
            }
            Command::ToggleDryRun => {
                self.user.enable_dry_run = !self.user.enable_dry_run;
                self.persist()?;
                format!("Dry run is now {}.", on_off(self.user.enable_dry_run))
            }
        };
        info!(?command, "{echo}");
        Ok(echo)
    }

    /// Handle one lock transition from the interception point.
    ///
    /// Returns `None` when disabled or when the lock did not change.
    pub fn observe(
        &mut self,
        previous_lock: f32,
        new_lock: f32,
        is_casting: bool,
    ) -> RuntimeResult<Option<CompensationOutcome>> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(None);
        };
        if previous_lock == new_lock {
            return Ok(None);
        }

        let sample = LockSample::new(previous_lock, new_lock, is_casting)?;
        let outcome = engine.process(sample, self.user.enable_dry_run)?;

        match &outcome {
            CompensationOutcome::Override(compensation) => {
                if compensation.should_apply() {
                    self.effector.set_lock(compensation.override_lock);
                }
                if self.user.enable_logging || sample.is_first_of_session() {
                    self.sink.emit(Diagnostic::for_compensation(compensation));
                }
            }
            CompensationOutcome::NoChange(rejection) => {
                let diagnostic = Diagnostic::for_rejection(*rejection, &sample);
                // Cast locks are routine; anomalies are always surfaced
                if self.user.enable_logging || diagnostic.severity > Severity::Info {
                    self.sink.emit(diagnostic);
                }
            }
        }

        Ok(Some(outcome))
    }

    /// Drain every pending transition from `source`.
    /// Returns how many transitions reached the engine.
    pub fn pump<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> RuntimeResult<usize> {
        let mut processed = 0;
        while let Some(t) = source.next_transition() {
            if self.observe(t.previous_lock, t.new_lock, t.is_casting)?.is_some() {
                processed += 1;
            }
        }
        Ok(processed)
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    pub fn user_config(&self) -> &Configuration {
        &self.user
    }

    /// Engine state, while enabled
    pub fn state(&self) -> Option<&CompensationState> {
        self.engine.as_ref().map(|e| e.state())
    }

    pub fn effector(&self) -> &E {
        &self.effector
    }

    pub fn effector_mut(&mut self) -> &mut E {
        &mut self.effector
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    fn activate(&mut self) -> RuntimeResult<()> {
        let engine_config = self.config.engine.clone();
        let default_lock = engine_config.default_lock;

        let engine = match self.config.seed {
            Some(seed) => {
                CompensationEngine::seeded(engine_config, seed.wrapping_add(self.generation))?
            }
            None => CompensationEngine::with_config(engine_config)?,
        };
        self.generation += 1;
        self.engine = Some(engine);
        self.effector.set_default_lock(default_lock);

        debug!(default_lock, generation = self.generation, "compensation engine started");
        Ok(())
    }

    fn deactivate(&mut self) {
        if self.engine.take().is_some() {
            self.effector
                .set_default_lock(self.config.engine.authority_default_lock);
            debug!("compensation engine stopped");
        }
    }

    fn persist(&self) -> RuntimeResult<()> {
        match &self.store {
            Some(store) => store.save(&self.user),
            None => Ok(()),
        }
    }
}

impl<E: Effector, D: DiagnosticsSink> Drop for Session<E, D> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
