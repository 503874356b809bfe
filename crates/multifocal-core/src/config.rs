//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::form::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
use crate::history::HISTORY_KEY;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "MULTIFOCAL_DATA_DIR";

/// Top-level multifocal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultifocalConfig {
    /// Directory holding the persisted history.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Records per history page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Storage key the history is kept under.
    #[serde(default = "default_history_key")]
    pub history_key: String,
    /// `strftime` format for record dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// `strftime` format for record times.
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(".local").join("share").join("multifocal"))
        .unwrap_or_else(|_| PathBuf::from(".multifocal"))
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_history_key() -> String {
    HISTORY_KEY.to_string()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl Default for MultifocalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            history_key: default_history_key(),
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

impl MultifocalConfig {
    /// Reject settings that would make the history unusable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.page_size >= 1, "page_size must be at least 1");
        anyhow::ensure!(!self.history_key.trim().is_empty(), "history_key must not be empty");
        anyhow::ensure!(!self.date_format.is_empty(), "date_format must not be empty");
        anyhow::ensure!(!self.time_format.is_empty(), "time_format must not be empty");
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `multifocal.toml` in the current directory
/// 2. `~/.config/multifocal/config.toml`
///
/// `MULTIFOCAL_DATA_DIR` overrides `data_dir` from any source.
pub fn load_config() -> Result<MultifocalConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MultifocalConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("multifocal.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MultifocalConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    config.validate()?;
    tracing::debug!(?config_path, data_dir = %config.data_dir.display(), "configuration loaded");
    Ok(config)
}

/// Parse a TOML configuration string.
pub fn parse_config(content: &str) -> Result<MultifocalConfig> {
    Ok(toml::from_str::<MultifocalConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("multifocal"))
}
