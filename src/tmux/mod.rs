mod client;
mod inventory;

pub use client::{validate_session_name, TmuxClient};
pub use inventory::list_active_sessions;

use anyhow::Result;
use std::path::Path;

/// One window of a session to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window name
    pub label: String,
    /// Command typed into the window's shell, if any
    pub command: Option<String>,
}

impl WindowSpec {
    /// Window running `command` in its shell
    pub fn with_command(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: Some(command.into()),
        }
    }

    /// Window with a bare shell
    pub fn shell(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: None,
        }
    }
}

/// Operations needed from the terminal multiplexer
pub trait Multiplexer {
    /// Fail if the multiplexer cannot be run at all
    fn ensure_available(&self) -> Result<()>;

    /// Names of live sessions; empty when no server is running
    fn list_sessions(&self) -> Result<Vec<String>>;

    /// Whether a session with exactly this name is live
    fn has_session(&self, name: &str) -> Result<bool>;

    /// Create a detached session in `cwd` with `windows` in order
    fn create_session(&self, name: &str, cwd: &Path, windows: &[WindowSpec]) -> Result<()>;

    /// Make `window` the active window of `session`
    fn select_window(&self, session: &str, window: &str) -> Result<()>;

    /// Attach the current terminal to `name` (outside tmux)
    fn attach(&self, name: &str) -> Result<()>;

    /// Switch the current client to `name` (inside tmux)
    fn switch_client(&self, name: &str) -> Result<()>;
}
