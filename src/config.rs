//! Configuration for splitw.
//!
//! The configuration file is read from `~/.splitw/config.toml` unless `-f`
//! names another one:
//!
//! ```toml
//! # Shell for new panes (default: $SHELL, then /bin/sh)
//! shell = "/bin/zsh"
//!
//! # Log level when -v is not given: error, warn, info, debug, trace
//! log_level = "info"
//!
//! [window]
//! # Size used when the terminal size cannot be read
//! width = 80
//! height = 24
//! base_index = 0
//!
//! [pane]
//! base_index = 0
//!
//! [environment]
//! EDITOR = "vim"
//!
//! [hooks]
//! after-split-window = ["list-panes"]
//! ```
//!
//! A missing file means defaults. A file that cannot be read or parsed is
//! reported and defaults are used.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default shell command
    pub shell: Option<String>,
    /// Log level (overridden by -v and RUST_LOG)
    pub log_level: Option<String>,
    /// Window settings
    pub window: WindowConfig,
    /// Pane settings
    pub pane: PaneConfig,
    /// Environment given to every pane
    pub environment: BTreeMap<String, String>,
    /// Hook name -> command lines
    pub hooks: BTreeMap<String, Vec<String>>,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub base_index: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            base_index: 0,
        }
    }
}

/// Pane configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    pub base_index: u32,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        splitw_dir().map(|dir| dir.join("config.toml"))
    }
}

/// `~/.splitw`, home of the config file and the log
pub fn splitw_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".splitw"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
