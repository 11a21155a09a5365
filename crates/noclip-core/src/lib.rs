//! NoClip Core - Fundamental types for lock compensation
//!
//! This crate defines the types shared by the engine and the runtime:
//! - Lock samples observed from the authority
//! - Compensation state persisted across samples
//! - Timing constants and millisecond helpers
//! - Error types

pub mod constants;
pub mod error;
pub mod sample;
pub mod state;

pub use constants::*;
pub use error::*;
pub use sample::*;
pub use state::*;
