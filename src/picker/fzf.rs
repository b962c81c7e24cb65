use anyhow::{Context, Result};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use super::Picker;
use crate::config::PickerSettings;
use crate::workspace::{DisplayRecord, FIELD_SEPARATOR};

/// fzf exit status when nothing matched the query
const EXIT_NO_MATCH: i32 = 1;
/// fzf exit status when the user pressed Esc / Ctrl-C
const EXIT_CANCELLED: i32 = 130;

/// Picker backed by the `fzf` executable
pub struct FzfPicker {
    program: String,
    prompt: String,
    height: Option<String>,
}

impl FzfPicker {
    /// Creates a picker using `fzf` from PATH
    pub fn new(settings: &PickerSettings) -> Self {
        Self {
            program: "fzf".to_string(),
            prompt: settings.prompt.clone(),
            height: settings.height.clone(),
        }
    }

    /// Arguments passed to fzf for a given initial query
    fn args(&self, query: &str) -> Vec<String> {
        let mut args = vec![
            "--delimiter".to_string(),
            FIELD_SEPARATOR.to_string(),
            "--with-nth".to_string(),
            "1".to_string(),
            "--no-multi".to_string(),
            "--select-1".to_string(),
            "--prompt".to_string(),
            self.prompt.clone(),
            "--query".to_string(),
            query.to_string(),
        ];
        if let Some(height) = &self.height {
            args.push("--height".to_string());
            args.push(height.clone());
        }
        args
    }
}

fn write_lines(mut sink: impl Write, records: &[DisplayRecord]) -> io::Result<()> {
    for record in records {
        writeln!(sink, "{}", record.to_line())?;
    }
    sink.flush()
}

impl Picker for FzfPicker {
    fn ensure_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .with_context(|| format!("{} not found in PATH", self.program))?;
        if !output.status.success() {
            anyhow::bail!("{} --version exited with {}", self.program, output.status);
        }
        Ok(())
    }

    fn pick_one(&self, records: &[DisplayRecord], query: &str) -> Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(self.args(query))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .context("Failed to spawn fzf")?;

        {
            let stdin = child.stdin.take().context("Failed to open fzf stdin")?;
            // --select-1 may exit before reading everything
            if let Err(e) = write_lines(stdin, records) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e).context("Failed to write to fzf");
                }
            }
        }

        let output = child.wait_with_output().context("Failed to wait for fzf")?;
        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(stdout.lines().next().map(|line| line.to_string()))
            }
            Some(EXIT_NO_MATCH) | Some(EXIT_CANCELLED) => {
                debug!("fzf returned no selection ({})", output.status);
                Ok(None)
            }
            _ => anyhow::bail!("fzf failed: {}", output.status),
        }
    }
}
