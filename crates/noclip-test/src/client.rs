//! Simulated client capabilities

use std::collections::VecDeque;

use noclip_core::AUTHORITY_DEFAULT_LOCK;
use noclip_engine::{Diagnostic, Severity};
use noclip_runtime::{DiagnosticsSink, Effector, LockTransition, SampleSource};

/// Client-side lock fields, as the runtime would write them
#[derive(Clone, Debug)]
pub struct SimulatedClient {
    /// Lock currently counting down
    pub lock: f32,
    /// Lock applied locally while waiting on the authority
    pub default_lock: f32,
    /// Number of overrides written
    pub lock_writes: u64,
}

impl SimulatedClient {
    pub fn new() -> Self {
        SimulatedClient {
            lock: 0.0,
            default_lock: AUTHORITY_DEFAULT_LOCK,
            lock_writes: 0,
        }
    }

    /// Start an action: the client locks itself for the default lock
    pub fn begin_action(&mut self) {
        self.lock = self.default_lock;
    }

    /// Let `elapsed` seconds pass; returns the lock left afterwards
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        self.lock = (self.lock - elapsed).max(0.0);
        self.lock
    }

    /// Authority lock lands; returns the lock the client showed before
    pub fn receive_lock(&mut self, new_lock: f32) -> f32 {
        std::mem::replace(&mut self.lock, new_lock)
    }
}

impl Default for SimulatedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Effector for SimulatedClient {
    fn set_lock(&mut self, seconds: f32) {
        self.lock = seconds;
        self.lock_writes += 1;
    }

    fn set_default_lock(&mut self, seconds: f32) {
        self.default_lock = seconds;
    }
}

/// Sample source replaying a fixed list of transitions
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    pending: VecDeque<LockTransition>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, previous_lock: f32, new_lock: f32, is_casting: bool) {
        self.pending.push_back(LockTransition {
            previous_lock,
            new_lock,
            is_casting,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl SampleSource for ScriptedSource {
    fn next_transition(&mut self) -> Option<LockTransition> {
        self.pending.pop_front()
    }
}

/// Diagnostics sink that keeps everything it receives
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
