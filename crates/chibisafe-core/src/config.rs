//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! default server, last used username, gallery page size, request timeout
//! and an optional log directory.
//!
//! Configuration is stored at `~/.config/chibisafe-client/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_TIMEOUT_SECS;

/// Application name used for config/data directory paths
const APP_NAME: &str = "chibisafe-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the default server
pub const SERVER_ENV: &str = "CHIBISAFE_SERVER";

/// Files per gallery page, as the server's own web UI pages them.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub default_server: Option<String>,
    pub last_username: Option<String>,
    pub page_size: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the saved login state
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Server to use when none is given: environment first, then config
    pub fn server(&self) -> Option<String> {
        std::env::var(SERVER_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.default_server.clone())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}
