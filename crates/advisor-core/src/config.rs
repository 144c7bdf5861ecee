use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENDPOINT_ENV: &str = "MYADVISOR_ENDPOINT";

const DEFAULT_USER_ID: &str = "default";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STUB_DELAY_MS: u64 = 2000;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Remote advisor endpoint; canned responses are used when unset
    pub endpoint: Option<String>,
    pub user_id: Option<String>,
    pub response_timeout_secs: Option<u64>,
    pub stub_delay_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config file (defaults if absent), then apply the endpoint
    /// environment override.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;
        config.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    /// A zero timeout would fail every call, so it falls back to the default
    pub fn response_timeout(&self) -> Duration {
        let secs = self
            .response_timeout_secs
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn stub_delay_ms(&self) -> u64 {
        self.stub_delay_ms.unwrap_or(DEFAULT_STUB_DELAY_MS)
    }

    /// Log file location: explicit setting, else the platform data directory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("myadvisor").join("myadvisor.log"))
        })
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("myadvisor").join("config.json"))
    }
}
