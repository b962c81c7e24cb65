//! Workspace records: the unit flowing from discovery to the picker.
//!
//! A workspace is either a live tmux session or a project directory that
//! could become one. Both are keyed by a logical name that doubles as the
//! tmux session name.

mod codec;
mod merge;
mod name;

pub use codec::{
    decode, has_reserved, DecodeError, DisplayRecord, SelectionDecision, FIELD_SEPARATOR,
};
pub use merge::merge;
pub use name::sanitize;

use serde::Serialize;
use std::fmt;

/// Where a workspace record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceKind {
    /// A session currently known to the tmux server
    ActiveSession,
    /// A directory with a VCS root that has no session yet
    Project,
}

impl WorkspaceKind {
    /// Tag written into the selection line
    pub fn tag(&self) -> &'static str {
        match self {
            WorkspaceKind::ActiveSession => "session",
            WorkspaceKind::Project => "project",
        }
    }

    /// Parse a tag written by [`WorkspaceKind::tag`]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "session" => Some(WorkspaceKind::ActiveSession),
            "project" => Some(WorkspaceKind::Project),
            _ => None,
        }
    }
}

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single selectable workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceRecord {
    /// Sanitized name, also the tmux session name
    pub name: String,
    /// Session or project
    pub kind: WorkspaceKind,
    /// Project root; only set for [`WorkspaceKind::Project`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Record as emitted by an adapter, before deduplication
pub type RawCandidate = WorkspaceRecord;

impl WorkspaceRecord {
    /// Record for a live session
    pub fn session(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: WorkspaceKind::ActiveSession,
            path: None,
        }
    }

    /// Record for a project root
    pub fn project(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: WorkspaceKind::Project,
            path: Some(path.into()),
        }
    }

    /// Whether this record refers to a live session
    pub fn is_session(&self) -> bool {
        self.kind == WorkspaceKind::ActiveSession
    }
}
