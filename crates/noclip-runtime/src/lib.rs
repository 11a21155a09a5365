//! NoClip Runtime - Session orchestration around the compensation engine
//!
//! This crate wires the engine to its collaborators:
//! 1. Sample source: lock transitions observed at the interception point
//! 2. Effector: the client's lock fields
//! 3. Diagnostics sink: chat / log output
//! 4. Command surface and persisted configuration
//!
//! A `Session` owns the engine only while enabled; disabling drops all
//! learned state.

pub mod capability;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use capability::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use session::*;
