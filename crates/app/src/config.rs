//! Client configuration
//!
//! Read from `config.toml` in the platform config directory. Every field is
//! optional; `SEDE_API_URL` and `SEDE_DATA_DIR` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "config.toml";
pub const API_URL_ENV: &str = "SEDE_API_URL";
pub const DATA_DIR_ENV: &str = "SEDE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Where the SQLite store lives; platform data dir when absent
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the user's config file (defaults when missing) and apply env
    /// overrides.
    pub fn load() -> Result<Self> {
        let config = match project_dirs() {
            Some(dirs) => Self::from_file(&dirs.config_dir().join(CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(sede_core::Error::from)?;
        let config = Self::parse(&content)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply environment overrides through `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "sede", "sede")
}
