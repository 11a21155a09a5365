//! Command surface: `/noclippy [on|off|toggle|log|dry]`

use std::str::FromStr;

use crate::{RuntimeError, RuntimeResult};

/// Help text shown for unknown options
pub const USAGE: &str = "Command must be \"/noclippy <option>\".\n\
on / off / toggle - Enables or disables compensation.\n\
log - Toggles logging.\n\
dry - Toggles dry run (will not override the animation lock).";

/// A parsed command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
    Toggle,
    ToggleLogging,
    ToggleDryRun,
}

impl Command {
    /// Parse a command argument; case and surrounding whitespace are ignored
    pub fn parse(argument: &str) -> RuntimeResult<Self> {
        match argument.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Command::On),
            "off" => Ok(Command::Off),
            "toggle" | "t" => Ok(Command::Toggle),
            "log" | "l" => Ok(Command::ToggleLogging),
            "dry" | "d" => Ok(Command::ToggleDryRun),
            other => Err(RuntimeError::UnknownCommand(other.to_string())),
        }
    }
}

impl FromStr for Command {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}
