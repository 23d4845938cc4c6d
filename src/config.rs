/// User configuration loaded from `config.toml`.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const APP_DIR: &str = "swatchr";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub history_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `"info"` or `"swatchr=debug"`.
    pub log_level: String,
    /// Ask before clearing the whole history in the TUI.
    pub confirm_clear: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_file: None,
            log_file: None,
            log_level: "info".to_string(),
            confirm_clear: true,
        }
    }
}

impl Config {
    /// Reads the config at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read config {}", path.display()))
            }
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| data_file("history.txt"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_file("swatchr.log"))
    }
}

/// Default config location inside the user's config directory.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR).join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// A file inside the user's data directory, or the working directory when
/// there is none.
fn data_file(name: &str) -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(APP_DIR).join(name),
        None => PathBuf::from(name),
    }
}
