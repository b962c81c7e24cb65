//! tmws: pick a live tmux session or a git project and jump into it.
//!
//! Live sessions and project directories (anything with a `.git` under the
//! projects directory) are merged into one list keyed by session name, shown
//! in fzf, and the pick is either attached or created with an editor, a git
//! TUI and two shells.

pub mod config;
pub mod discovery;
pub mod error;
pub mod launcher;
pub mod materialize;
pub mod picker;
pub mod tmux;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use error::LaunchError;
pub use launcher::{Launcher, Outcome};
