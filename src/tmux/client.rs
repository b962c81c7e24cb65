use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::{Multiplexer, WindowSpec};

/// Session names must not contain tmux target separators (`:` and `.`)
static SESSION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^.:\t\r\n]+$").expect("Invalid SESSION_NAME_PATTERN regex")
});

/// Stderr fragments tmux prints when no server is running
const NO_SERVER_MARKERS: [&str; 2] = ["no server running", "error connecting to"];

/// Validate a session name before using it in a target
pub fn validate_session_name(name: &str) -> Result<()> {
    if !SESSION_NAME_PATTERN.is_match(name) {
        anyhow::bail!("Invalid tmux session name: {:?}", name);
    }
    Ok(())
}

/// Exact-match target for a session (`=name`), so `api` never matches `api2`
fn session_target(session: &str) -> String {
    format!("={}", session)
}

/// Exact-match target for a window of a session
fn window_target(session: &str, window: &str) -> String {
    format!("={}:{}", session, window)
}

/// Client for interacting with tmux
pub struct TmuxClient {
    /// tmux executable
    program: String,
}

impl TmuxClient {
    /// Creates a new TmuxClient using `tmux` from PATH
    pub fn new() -> Self {
        Self {
            program: "tmux".to_string(),
        }
    }

    /// Run tmux with `args`, returning stdout on success
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!("{} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute tmux {}", args[0]))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tmux {} failed: {}", args[0], stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Sends literal text to a window, then presses Enter
    fn run_command(&self, target: &str, command: &str) -> Result<()> {
        self.run(&["send-keys", "-t", target, "-l", command])?;
        self.run(&["send-keys", "-t", target, "Enter"])?;
        Ok(())
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer for TmuxClient {
    fn ensure_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-V")
            .output()
            .with_context(|| format!("{} not found in PATH", self.program))?;
        if !output.status.success() {
            anyhow::bail!("{} -V exited with {}", self.program, output.status);
        }
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .args(["list-sessions", "-F", "#{session_name}"])
            .output()
            .context("Failed to execute tmux list-sessions")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if NO_SERVER_MARKERS.iter().any(|m| stderr.contains(m)) {
                debug!("No tmux server running");
                return Ok(Vec::new());
            }
            anyhow::bail!("tmux list-sessions failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect())
    }

    fn has_session(&self, name: &str) -> Result<bool> {
        if validate_session_name(name).is_err() {
            return Ok(false);
        }
        // Exit status 1 covers both "no such session" and "no server"
        let output = Command::new(&self.program)
            .args(["has-session", "-t", &session_target(name)])
            .output()
            .context("Failed to execute tmux has-session")?;
        Ok(output.status.success())
    }

    fn create_session(&self, name: &str, cwd: &Path, windows: &[WindowSpec]) -> Result<()> {
        validate_session_name(name)?;
        let cwd = cwd
            .to_str()
            .with_context(|| format!("Non UTF-8 session directory: {}", cwd.display()))?;
        let (first, rest) = windows
            .split_first()
            .context("A session needs at least one window")?;

        self.run(&["new-session", "-d", "-s", name, "-c", cwd, "-n", &first.label])?;
        let session_end = format!("{}:", session_target(name));
        for window in rest {
            self.run(&["new-window", "-t", &session_end, "-n", &window.label, "-c", cwd])?;
        }

        for window in windows {
            if let Some(command) = &window.command {
                self.run_command(&window_target(name, &window.label), command)?;
            }
        }

        Ok(())
    }

    fn select_window(&self, session: &str, window: &str) -> Result<()> {
        validate_session_name(session)?;
        self.run(&["select-window", "-t", &window_target(session, window)])?;
        Ok(())
    }

    fn attach(&self, name: &str) -> Result<()> {
        validate_session_name(name)?;
        // Interactive: inherit the terminal instead of capturing output
        let status = Command::new(&self.program)
            .args(["attach-session", "-t", &session_target(name)])
            .status()
            .context("Failed to execute tmux attach-session")?;

        if !status.success() {
            anyhow::bail!("tmux attach-session failed for {}: {}", name, status);
        }
        Ok(())
    }

    fn switch_client(&self, name: &str) -> Result<()> {
        validate_session_name(name)?;
        self.run(&["switch-client", "-t", &session_target(name)])?;
        Ok(())
    }
}
