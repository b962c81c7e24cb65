use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the projects directory
pub const BASE_DIR_ENV: &str = "TMWS_PROJECTS_DIR";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tmux WorkSpaces - pick a tmux session or git project and jump into it"
)]
pub struct Config {
    /// Initial picker query; a single match is opened without prompting
    pub query: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for git repositories
    #[arg(short, long)]
    pub base_dir: Option<String>,

    /// Maximum depth of the repository scan
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Print the merged workspace list instead of opening the picker
    #[arg(short, long)]
    pub list: bool,

    /// With --list, print JSON
    #[arg(long, requires = "list")]
    pub json: bool,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Initial query, empty when none was given
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory scanned for projects; `~` is expanded
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Maximum depth of a `.git` marker below `base_dir`
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Commands for new sessions
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Picker appearance
    #[serde(default)]
    pub picker: PickerSettings,
}

fn default_base_dir() -> String {
    "~/Projects".to_string()
}

fn default_max_depth() -> usize {
    3
}

/// Commands started in a freshly created session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Typed into the `nvim` window
    #[serde(default = "default_editor_command")]
    pub editor_command: String,

    /// Typed into the `lazygit` window
    #[serde(default = "default_git_command")]
    pub git_command: String,
}

fn default_editor_command() -> String {
    "nvim".to_string()
}

fn default_git_command() -> String {
    "lazygit".to_string()
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            editor_command: default_editor_command(),
            git_command: default_git_command(),
        }
    }
}

/// fzf options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerSettings {
    /// Prompt shown before the query
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// fzf `--height` (e.g. "40%"); full screen when unset
    #[serde(default = "default_height")]
    pub height: Option<String>,
}

fn default_prompt() -> String {
    "workspace> ".to_string()
}

fn default_height() -> Option<String> {
    Some("40%".to_string())
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            height: default_height(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            max_depth: default_max_depth(),
            layout: LayoutSettings::default(),
            picker: PickerSettings::default(),
        }
    }
}

/// Resolved, read-only configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Directory scanned for projects, absolute once frozen
    pub base_dir: PathBuf,
    /// Maximum scan depth
    pub max_depth: usize,
    /// Commands for new sessions
    pub layout: LayoutSettings,
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(p) = path {
            if !p.exists() {
                anyhow::bail!("Config file not found: {:?}", p);
            }
            return Self::read(p);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("tmws/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/tmws/config.toml")),
            dirs::home_dir().map(|p| p.join(".tmws.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read(path);
            }
        }

        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment overrides (take precedence over the file)
    pub fn merge_env(&mut self) {
        match std::env::var(BASE_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => self.base_dir = dir,
            _ => {}
        }
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(base_dir) = &cli.base_dir {
            self.base_dir = base_dir.clone();
        }
        if let Some(max_depth) = cli.max_depth {
            self.max_depth = max_depth;
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_MAX_DEPTH: usize = 1;

        if self.max_depth < MIN_MAX_DEPTH {
            self.max_depth = MIN_MAX_DEPTH;
        }
        if self.base_dir.trim().is_empty() {
            self.base_dir = default_base_dir();
        }
    }

    /// Freeze into the configuration used for one run
    ///
    /// A relative base directory is resolved against the current directory.
    pub fn launch_config(&self) -> LaunchConfig {
        let base_dir = expand_home(&self.base_dir);
        LaunchConfig {
            base_dir: std::path::absolute(&base_dir).unwrap_or(base_dir),
            max_depth: self.max_depth,
            layout: self.layout.clone(),
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
