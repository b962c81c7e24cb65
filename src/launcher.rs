//! End-to-end flow: collect, merge, pick, decode, materialize.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::LaunchConfig;
use crate::discovery::{discover_projects, VcsWalker};
use crate::error::LaunchError;
use crate::materialize::{AttachMode, Materialized, Materializer};
use crate::picker::Picker;
use crate::tmux::{list_active_sessions, Multiplexer};
use crate::workspace::{decode, merge, DisplayRecord, WorkspaceRecord};

/// How a run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No sessions and no projects; the picker was not shown
    NothingFound,
    /// The picker returned no selection
    Cancelled,
    /// A session was attached, possibly after being created
    Opened(Materialized),
}

/// Wires the capabilities together for one invocation
pub struct Launcher<'a, M: ?Sized, P: ?Sized, W: ?Sized> {
    config: &'a LaunchConfig,
    mux: &'a M,
    picker: &'a P,
    walker: &'a W,
    mode: AttachMode,
}

impl<'a, M, P, W> Launcher<'a, M, P, W>
where
    M: Multiplexer + ?Sized,
    P: Picker + ?Sized,
    W: VcsWalker + ?Sized,
{
    /// Creates a launcher over the given capabilities
    pub fn new(
        config: &'a LaunchConfig,
        mux: &'a M,
        picker: &'a P,
        walker: &'a W,
        mode: AttachMode,
    ) -> Self {
        Self {
            config,
            mux,
            picker,
            walker,
            mode,
        }
    }

    /// Merged, ordered workspaces (sessions first)
    ///
    /// Fails before scanning when the base directory is missing. A relative
    /// base directory is resolved against the current directory so project
    /// paths are always absolute.
    pub fn collect(&self) -> Result<Vec<WorkspaceRecord>, LaunchError> {
        let base_dir = &self.config.base_dir;
        if !base_dir.is_dir() {
            return Err(LaunchError::BaseDirMissing(base_dir.clone()));
        }
        let base_dir = std::path::absolute(base_dir)
            .map_err(|_| LaunchError::BaseDirMissing(base_dir.clone()))?;

        let sessions = list_active_sessions(self.mux).map_err(LaunchError::Multiplexer)?;
        let projects = discover_projects(self.walker, &base_dir, self.config.max_depth);
        debug!(
            "Collected {} sessions and {} projects",
            sessions.len(),
            projects.len()
        );

        Ok(merge(sessions.into_iter().chain(projects)))
    }

    /// Workspaces for `--list`; only tmux is required
    pub fn list(&self) -> Result<Vec<WorkspaceRecord>, LaunchError> {
        self.mux
            .ensure_available()
            .map_err(LaunchError::MissingCapability)?;
        self.collect()
    }

    /// Run the interactive flow with an initial picker query
    pub fn run(&self, query: &str) -> Result<Outcome, LaunchError> {
        self.mux
            .ensure_available()
            .map_err(LaunchError::MissingCapability)?;
        self.picker
            .ensure_available()
            .map_err(LaunchError::MissingCapability)?;

        let records = self.collect()?;
        if records.is_empty() {
            info!("No sessions or projects found");
            return Ok(Outcome::NothingFound);
        }

        let display = display_records(records);
        if display.is_empty() {
            info!("No workspace can be shown in the picker");
            return Ok(Outcome::NothingFound);
        }

        let Some(line) = self
            .picker
            .pick_one(&display, query)
            .map_err(LaunchError::Picker)?
        else {
            info!("No selection");
            return Ok(Outcome::Cancelled);
        };

        let decision = decode(&line)?;
        debug!("Picked {:?}", decision);

        Materializer::new(self.mux, &self.config.layout, self.mode)
            .materialize(&decision)
            .map(Outcome::Opened)
    }
}

/// Picker entries for the records that can be encoded, in order
fn display_records(records: Vec<WorkspaceRecord>) -> Vec<DisplayRecord> {
    records
        .into_iter()
        .filter_map(|record| {
            let name = record.name.clone();
            let display = DisplayRecord::from_record(record);
            if display.is_none() {
                warn!("Cannot offer workspace {:?} in the picker", name);
            }
            display
        })
        .collect()
}

/// Render `--list` output, one record per line or a JSON array
pub fn format_listing(records: &[WorkspaceRecord], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(records)?);
    }

    let lines: Vec<String> = records
        .iter()
        .map(|record| match &record.path {
            Some(path) => format!("{}  {}  {}", record.kind, record.name, path),
            None => format!("{}  {}", record.kind, record.name),
        })
        .collect();
    Ok(lines.join("\n"))
}
