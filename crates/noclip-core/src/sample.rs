//! Lock samples observed at the action effect interception point

use crate::{NoclipError, NoclipResult};

/// One authority lock update
///
/// `previous_lock` is what the client was displaying right before the
/// authority's value landed; `new_lock` is the authority's value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LockSample {
    /// Lock remaining on the client before the update (seconds)
    pub previous_lock: f32,
    /// Lock issued by the authority (seconds)
    pub new_lock: f32,
    /// Whether the player is casting when the update lands
    pub is_casting: bool,
}

impl LockSample {
    /// Create a validated sample
    pub fn new(previous_lock: f32, new_lock: f32, is_casting: bool) -> NoclipResult<Self> {
        let sample = LockSample {
            previous_lock,
            new_lock,
            is_casting,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Reject NaN, infinite and negative durations
    pub fn validate(&self) -> NoclipResult<()> {
        check_duration("previous lock", self.previous_lock)?;
        check_duration("new lock", self.new_lock)
    }

    /// Whether the lock actually changed
    pub fn is_transition(&self) -> bool {
        self.previous_lock != self.new_lock
    }

    /// First sample of a session: the client had no lock running
    pub fn is_first_of_session(&self) -> bool {
        self.previous_lock == 0.0
    }
}

fn check_duration(field: &'static str, value: f32) -> NoclipResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NoclipError::InvalidLock { field, value })
    }
}
