//! NoClip Test Harness - Latency simulation and session replay
//!
//! This crate provides:
//! - Seeded latency profiles (uniform, normal, heavy tailed)
//! - A simulated client implementing the runtime capabilities
//! - Scripted sample sources
//! - Whole-session replay with saved-time reporting

pub mod client;
pub mod latency;
pub mod simulator;

pub use client::*;
pub use latency::*;
pub use simulator::*;
