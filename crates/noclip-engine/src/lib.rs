//! NoClip Engine - Lock compensation
//!
//! This crate implements the compensation pipeline run once per lock update:
//! - Gatekeeper: cast locks, foreign tool fingerprints, suppression window
//! - Delay estimator: exponentially smoothed network + server delay
//! - Jitter simulator: bounded random walk standing in for local latency
//! - Compensator: final clamped override
//! - Diagnostics: human readable decision trace

pub mod compensator;
pub mod diagnostics;
pub mod engine;
pub mod estimator;
pub mod gate;
pub mod jitter;

pub use compensator::*;
pub use diagnostics::*;
pub use engine::*;
pub use estimator::*;
pub use gate::*;
pub use jitter::*;
