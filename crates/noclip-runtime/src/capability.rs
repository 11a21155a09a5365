//! Capabilities the session needs from the host client

use noclip_engine::Diagnostic;

/// One observed lock transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LockTransition {
    pub previous_lock: f32,
    pub new_lock: f32,
    pub is_casting: bool,
}

/// Polled source of lock transitions
pub trait SampleSource {
    /// Next transition since the last poll, if any
    fn next_transition(&mut self) -> Option<LockTransition>;
}

/// Writable client lock fields
pub trait Effector {
    /// Overwrite the lock currently counting down
    fn set_lock(&mut self, seconds: f32);

    /// Overwrite the lock the client applies while waiting on the authority
    fn set_default_lock(&mut self, seconds: f32);
}

/// Receiver of user-visible diagnostics
pub trait DiagnosticsSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Box<S> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

impl<E: Effector + ?Sized> Effector for Box<E> {
    fn set_lock(&mut self, seconds: f32) {
        (**self).set_lock(seconds)
    }

    fn set_default_lock(&mut self, seconds: f32) {
        (**self).set_default_lock(seconds)
    }
}
