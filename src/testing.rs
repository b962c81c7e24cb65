//! In-memory stand-ins for tmux and fzf used by unit tests.

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::picker::Picker;
use crate::tmux::{Multiplexer, WindowSpec};
use crate::workspace::DisplayRecord;

/// A call made against [`FakeTmux`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxCall {
    ListSessions,
    HasSession(String),
    CreateSession {
        name: String,
        cwd: PathBuf,
        windows: Vec<WindowSpec>,
    },
    SelectWindow {
        session: String,
        window: String,
    },
    Attach(String),
    SwitchClient(String),
}

/// tmux server kept in memory
#[derive(Default)]
pub struct FakeTmux {
    sessions: RefCell<BTreeSet<String>>,
    calls: RefCell<Vec<MuxCall>>,
    killed_after_list: RefCell<Vec<String>>,
    create_error: RefCell<Option<String>>,
    missing: Cell<bool>,
}

impl FakeTmux {
    pub fn with_sessions(names: &[&str]) -> Self {
        let fake = Self::default();
        fake.sessions
            .borrow_mut()
            .extend(names.iter().map(|n| n.to_string()));
        fake
    }

    /// Kill `name` right after it has been listed
    pub fn kill_after_list(&self, name: &str) {
        self.killed_after_list.borrow_mut().push(name.to_string());
    }

    /// Make `create_session` fail with `message`
    pub fn fail_create(&self, message: &str) {
        *self.create_error.borrow_mut() = Some(message.to_string());
    }

    /// Pretend tmux is not installed
    pub fn set_missing(&self) {
        self.missing.set(true);
    }

    pub fn calls(&self) -> Vec<MuxCall> {
        self.calls.borrow().clone()
    }

    /// Calls other than queries
    pub fn mutations(&self) -> Vec<MuxCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, MuxCall::ListSessions | MuxCall::HasSession(_)))
            .collect()
    }

    fn record(&self, call: MuxCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Multiplexer for FakeTmux {
    fn ensure_available(&self) -> Result<()> {
        if self.missing.get() {
            anyhow::bail!("tmux not found in PATH");
        }
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        self.record(MuxCall::ListSessions);
        let listed: Vec<String> = self.sessions.borrow().iter().cloned().collect();
        for name in self.killed_after_list.borrow_mut().drain(..) {
            self.sessions.borrow_mut().remove(&name);
        }
        Ok(listed)
    }

    fn has_session(&self, name: &str) -> Result<bool> {
        self.record(MuxCall::HasSession(name.to_string()));
        Ok(self.sessions.borrow().contains(name))
    }

    fn create_session(&self, name: &str, cwd: &Path, windows: &[WindowSpec]) -> Result<()> {
        self.record(MuxCall::CreateSession {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            windows: windows.to_vec(),
        });
        if let Some(message) = self.create_error.borrow().as_ref() {
            anyhow::bail!("{}", message);
        }
        if !self.sessions.borrow_mut().insert(name.to_string()) {
            anyhow::bail!("duplicate session: {}", name);
        }
        Ok(())
    }

    fn select_window(&self, session: &str, window: &str) -> Result<()> {
        self.record(MuxCall::SelectWindow {
            session: session.to_string(),
            window: window.to_string(),
        });
        Ok(())
    }

    fn attach(&self, name: &str) -> Result<()> {
        self.record(MuxCall::Attach(name.to_string()));
        Ok(())
    }

    fn switch_client(&self, name: &str) -> Result<()> {
        self.record(MuxCall::SwitchClient(name.to_string()));
        Ok(())
    }
}

enum Script {
    Cancel,
    OnlyMatch,
    Choose(String),
    Raw(String),
}

/// Picker answering from a script and remembering what it was shown
pub struct ScriptedPicker {
    script: Script,
    shown: RefCell<Option<Vec<String>>>,
    missing: Cell<bool>,
}

impl ScriptedPicker {
    fn new(script: Script) -> Self {
        Self {
            script,
            shown: RefCell::new(None),
            missing: Cell::new(false),
        }
    }

    /// User presses Esc
    pub fn cancel() -> Self {
        Self::new(Script::Cancel)
    }

    /// Behaves like `fzf --select-1`: picks the record when exactly one
    /// label contains the query, otherwise nothing
    pub fn only_match() -> Self {
        Self::new(Script::OnlyMatch)
    }

    /// User picks the first record whose label is exactly `label`
    pub fn choose(label: &str) -> Self {
        Self::new(Script::Choose(label.to_string()))
    }

    /// Picker answers `line` verbatim
    pub fn raw(line: &str) -> Self {
        Self::new(Script::Raw(line.to_string()))
    }

    pub fn set_missing(&self) {
        self.missing.set(true);
    }

    /// Labels shown on the last invocation, `None` if never invoked
    pub fn shown(&self) -> Option<Vec<String>> {
        self.shown.borrow().clone()
    }
}

impl Picker for ScriptedPicker {
    fn ensure_available(&self) -> Result<()> {
        if self.missing.get() {
            anyhow::bail!("fzf not found in PATH");
        }
        Ok(())
    }

    fn pick_one(&self, records: &[DisplayRecord], query: &str) -> Result<Option<String>> {
        *self.shown.borrow_mut() = Some(records.iter().map(|r| r.label.clone()).collect());

        let picked = match &self.script {
            Script::Cancel => None,
            Script::OnlyMatch => {
                let matches: Vec<&DisplayRecord> =
                    records.iter().filter(|r| r.label.contains(query)).collect();
                match matches.as_slice() {
                    [only] => Some(only.to_line()),
                    _ => None,
                }
            }
            Script::Choose(label) => records
                .iter()
                .find(|r| &r.label == label)
                .map(|r| r.to_line()),
            Script::Raw(line) => Some(line.clone()),
        };
        Ok(picked)
    }
}
