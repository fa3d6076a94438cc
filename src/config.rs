//! Editor configuration, read from an optional `hi.toml`.

use crate::buffer::Limits;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up next to the working directory and the executable.
const CONFIG_FILE: &str = "hi.toml";

/// Parsed representation of `hi.toml`.
///
/// Every field has a default, so an empty file (or no file at all) is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document ceiling: the most lines the buffer will hold.
    pub max_lines: usize,
    /// Per-line ceiling, in chars.
    pub max_line_length: usize,
    /// How long to wait after an Escape for a second one. Two separate key presses have to
    /// land inside this window to count as a double Escape.
    pub escape_timeout_ms: u64,
    /// Mirror copied lines to the system clipboard.
    pub system_clipboard: bool,
    /// Where log output goes. Defaults to `hi.log` in the temp dir.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `"info"` or `"hi=debug"`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_lines: 1000,
            max_line_length: 1000,
            escape_timeout_ms: 300,
            system_clipboard: true,
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the first config file found in `search_paths`, or the defaults if there is none.
    pub fn load(search_paths: &[PathBuf]) -> Result<Self> {
        match search_paths.iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        Self::from_toml(&s).with_context(|| format!("Parsing {}", path.display()))
    }

    fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        anyhow::ensure!(cfg.max_lines >= 1, "max_lines must be at least 1");
        anyhow::ensure!(cfg.max_line_length >= 1, "max_line_length must be at least 1");
        Ok(cfg)
    }

    /// Buffer capacity derived from this config.
    pub fn limits(&self) -> Limits {
        Limits { max_lines: self.max_lines, max_line_len: self.max_line_length }
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    /// The log file path, falling back to `hi.log` in the system temp dir.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| std::env::temp_dir().join("hi.log"))
    }
}

/// Get the config search path, in priority order.
///
/// Returns:
/// - `$HI_CONFIG` if set
/// - `./hi.toml` relative to the current working directory
/// - `hi.toml` next to the executable
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = std::env::var_os("HI_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            paths.push(dir.join(CONFIG_FILE));
        }
    }

    paths
}
