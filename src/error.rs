//! Checked failures of a launch.

use std::path::PathBuf;
use thiserror::Error;

use crate::workspace::DecodeError;

/// Error type for a launcher run; every variant maps to exit status 1
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A required external program is missing or broken
    #[error("required tool unavailable: {0:#}")]
    MissingCapability(anyhow::Error),

    /// The projects directory does not exist
    #[error("base directory does not exist: {}", .0.display())]
    BaseDirMissing(PathBuf),

    /// The picker returned a line we could not decode
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A picked session disappeared before it could be attached
    #[error("session '{name}' no longer exists")]
    StaleSession { name: String },

    /// A picked project directory disappeared or is not a directory
    #[error("project directory does not exist: {path}")]
    InvalidProjectPath { path: String },

    /// The picked name cannot be used as a tmux session name
    #[error("invalid session name: {name:?}")]
    InvalidSessionName { name: String },

    /// A tmux call failed
    #[error("tmux: {0:#}")]
    Multiplexer(anyhow::Error),

    /// The picker itself failed
    #[error("picker: {0:#}")]
    Picker(anyhow::Error),
}

impl LaunchError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }
}
