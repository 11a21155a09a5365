//! Runtime errors

use std::path::PathBuf;

use thiserror::Error;

use noclip_core::NoclipError;

use crate::USAGE;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Invalid usage: unknown option {0:?}.\n{usage}", usage = USAGE)]
    UnknownCommand(String),

    #[error("Failed to access config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Logging already initialised")]
    LoggingInit,

    #[error(transparent)]
    Engine(#[from] NoclipError),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
