//! Turning a picked workspace into an attached tmux session.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::LayoutSettings;
use crate::error::LaunchError;
use crate::tmux::{validate_session_name, Multiplexer, WindowSpec};
use crate::workspace::SelectionDecision;

/// Set by tmux inside every client
pub const INSIDE_TMUX_ENV: &str = "TMUX";

const EDITOR_WINDOW: &str = "nvim";
const GIT_WINDOW: &str = "lazygit";
const SHELL_WINDOWS: [&str; 2] = ["shell1", "shell2"];

/// How to bring a session to the user's terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// Not inside tmux: attach this terminal
    Attach,
    /// Already a tmux client: switch it
    Switch,
}

impl AttachMode {
    /// Decide from `$TMUX`
    pub fn from_env() -> Self {
        match std::env::var_os(INSIDE_TMUX_ENV) {
            Some(value) if !value.is_empty() => AttachMode::Switch,
            _ => AttachMode::Attach,
        }
    }
}

/// Everything needed to create a project session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub name: String,
    pub cwd: PathBuf,
    /// Windows in creation order
    pub windows: Vec<WindowSpec>,
    /// Window focused before attaching
    pub active_window: String,
}

impl SessionPlan {
    /// Editor, git TUI and two shells, editor focused
    pub fn for_project(name: &str, cwd: &Path, layout: &LayoutSettings) -> Self {
        let mut windows = vec![
            WindowSpec::with_command(EDITOR_WINDOW, &layout.editor_command),
            WindowSpec::with_command(GIT_WINDOW, &layout.git_command),
        ];
        windows.extend(SHELL_WINDOWS.iter().map(|label| WindowSpec::shell(*label)));

        Self {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            windows,
            active_window: EDITOR_WINDOW.to_string(),
        }
    }
}

/// What materializing a decision did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// Joined a session that was already live
    Attached { name: String },
    /// Created the session first, then joined it
    Created { name: String },
}

/// Sequences multiplexer calls for one decision
pub struct Materializer<'a, M: Multiplexer + ?Sized> {
    mux: &'a M,
    layout: &'a LayoutSettings,
    mode: AttachMode,
}

impl<'a, M: Multiplexer + ?Sized> Materializer<'a, M> {
    /// Creates a materializer for one decision
    pub fn new(mux: &'a M, layout: &'a LayoutSettings, mode: AttachMode) -> Self {
        Self { mux, layout, mode }
    }

    /// Attach to the picked session, creating it from its project if needed
    ///
    /// A picked session that is gone is an error even if a project with the
    /// same name exists. Nothing is created before the project path and
    /// session name have been checked. A tmux failure while creating windows
    /// leaves the partial session in place.
    pub fn materialize(&self, decision: &SelectionDecision) -> Result<Materialized, LaunchError> {
        let name = decision.name.as_str();
        let live = self
            .mux
            .has_session(name)
            .map_err(LaunchError::Multiplexer)?;

        if live {
            self.enter(name)?;
            return Ok(Materialized::Attached {
                name: name.to_string(),
            });
        }

        let Some(path) = decision.project_path.as_deref() else {
            return Err(LaunchError::StaleSession {
                name: name.to_string(),
            });
        };

        let cwd = Path::new(path);
        if !cwd.is_dir() {
            return Err(LaunchError::InvalidProjectPath {
                path: path.to_string(),
            });
        }
        if validate_session_name(name).is_err() {
            return Err(LaunchError::InvalidSessionName {
                name: name.to_string(),
            });
        }

        let plan = SessionPlan::for_project(name, cwd, self.layout);
        info!("Creating session {} in {}", plan.name, cwd.display());
        self.mux
            .create_session(&plan.name, &plan.cwd, &plan.windows)
            .map_err(LaunchError::Multiplexer)?;
        self.mux
            .select_window(&plan.name, &plan.active_window)
            .map_err(LaunchError::Multiplexer)?;

        self.enter(name)?;
        Ok(Materialized::Created {
            name: name.to_string(),
        })
    }

    fn enter(&self, name: &str) -> Result<(), LaunchError> {
        info!("{:?} -> {}", self.mode, name);
        let result = match self.mode {
            AttachMode::Attach => self.mux.attach(name),
            AttachMode::Switch => self.mux.switch_client(name),
        };
        result.map_err(LaunchError::Multiplexer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTmux, MuxCall};
    use pretty_assertions::assert_eq;

    fn project_decision(name: &str, path: &Path) -> SelectionDecision {
        SelectionDecision {
            name: name.to_string(),
            project_path: Some(path.display().to_string()),
        }
    }

    #[test]
    fn test_attach_mode_from_env() {
        temp_env::with_var(INSIDE_TMUX_ENV, Some("/tmp/tmux-1000/default,123,0"), || {
            assert_eq!(AttachMode::from_env(), AttachMode::Switch);
        });
        temp_env::with_var(INSIDE_TMUX_ENV, Some(""), || {
            assert_eq!(AttachMode::from_env(), AttachMode::Attach);
        });
        temp_env::with_var_unset(INSIDE_TMUX_ENV, || {
            assert_eq!(AttachMode::from_env(), AttachMode::Attach);
        });
    }

    #[test]
    fn test_plan_layout() {
        let layout = LayoutSettings::default();
        let plan = SessionPlan::for_project("alpha", Path::new("/p/alpha"), &layout);
        assert_eq!(
            plan.windows,
            vec![
                WindowSpec::with_command("nvim", "nvim"),
                WindowSpec::with_command("lazygit", "lazygit"),
                WindowSpec::shell("shell1"),
                WindowSpec::shell("shell2"),
            ]
        );
        assert_eq!(plan.active_window, "nvim");
    }

    #[test]
    fn test_live_session_is_attached() {
        let mux = FakeTmux::with_sessions(&["work"]);
        let layout = LayoutSettings::default();
        let decision = SelectionDecision {
            name: "work".to_string(),
            project_path: None,
        };

        let result = Materializer::new(&mux, &layout, AttachMode::Attach).materialize(&decision);
        assert_eq!(
            result.unwrap(),
            Materialized::Attached {
                name: "work".to_string()
            }
        );
        assert_eq!(mux.mutations(), vec![MuxCall::Attach("work".to_string())]);
    }

    #[test]
    fn test_switch_inside_tmux() {
        let mux = FakeTmux::with_sessions(&["work"]);
        let layout = LayoutSettings::default();
        let decision = SelectionDecision {
            name: "work".to_string(),
            project_path: None,
        };

        Materializer::new(&mux, &layout, AttachMode::Switch)
            .materialize(&decision)
            .unwrap();
        assert_eq!(mux.mutations(), vec![MuxCall::SwitchClient("work".to_string())]);
    }

    #[test]
    fn test_project_is_created_then_attached() {
        let tmp = tempfile::tempdir().unwrap();
        let mux = FakeTmux::default();
        let layout = LayoutSettings {
            editor_command: "hx".to_string(),
            git_command: "gitui".to_string(),
        };

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("alpha", tmp.path()));
        assert_eq!(
            result.unwrap(),
            Materialized::Created {
                name: "alpha".to_string()
            }
        );

        let plan = SessionPlan::for_project("alpha", tmp.path(), &layout);
        assert_eq!(
            mux.mutations(),
            vec![
                MuxCall::CreateSession {
                    name: "alpha".to_string(),
                    cwd: tmp.path().to_path_buf(),
                    windows: plan.windows,
                },
                MuxCall::SelectWindow {
                    session: "alpha".to_string(),
                    window: "nvim".to_string(),
                },
                MuxCall::Attach("alpha".to_string()),
            ]
        );
    }

    #[test]
    fn test_live_session_wins_over_project_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mux = FakeTmux::with_sessions(&["alpha"]);
        let layout = LayoutSettings::default();

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("alpha", tmp.path()));
        assert!(matches!(result, Ok(Materialized::Attached { .. })));
        assert_eq!(mux.mutations(), vec![MuxCall::Attach("alpha".to_string())]);
    }

    #[test]
    fn test_vanished_session_is_stale() {
        let mux = FakeTmux::default();
        let layout = LayoutSettings::default();
        let decision = SelectionDecision {
            name: "beta".to_string(),
            project_path: None,
        };

        let result = Materializer::new(&mux, &layout, AttachMode::Attach).materialize(&decision);
        assert!(matches!(result, Err(LaunchError::StaleSession { ref name }) if name == "beta"));
        assert!(mux.mutations().is_empty());
    }

    #[test]
    fn test_missing_project_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("gone");
        let mux = FakeTmux::default();
        let layout = LayoutSettings::default();

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("gone", &gone));
        assert!(matches!(result, Err(LaunchError::InvalidProjectPath { .. })));
        assert!(mux.mutations().is_empty());
    }

    #[test]
    fn test_project_path_that_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, "").unwrap();
        let mux = FakeTmux::default();
        let layout = LayoutSettings::default();

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("file", &file));
        assert!(matches!(result, Err(LaunchError::InvalidProjectPath { .. })));
    }

    #[test]
    fn test_unusable_name_is_rejected_before_create() {
        let tmp = tempfile::tempdir().unwrap();
        let mux = FakeTmux::default();
        let layout = LayoutSettings::default();

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("my.app", tmp.path()));
        assert!(matches!(result, Err(LaunchError::InvalidSessionName { .. })));
        assert!(mux.mutations().is_empty());
    }

    #[test]
    fn test_create_failure_is_propagated() {
        let tmp = tempfile::tempdir().unwrap();
        let mux = FakeTmux::default();
        mux.fail_create("tmux new-window failed: no space for new pane");
        let layout = LayoutSettings::default();

        let result = Materializer::new(&mux, &layout, AttachMode::Attach)
            .materialize(&project_decision("alpha", tmp.path()));
        assert!(matches!(result, Err(LaunchError::Multiplexer(_))));
        // No attach after a failed create
        assert!(!mux
            .mutations()
            .iter()
            .any(|c| matches!(c, MuxCall::Attach(_))));
    }
}
