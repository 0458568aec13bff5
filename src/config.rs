//! Configuration
//!
//! The FoodData Central API key and tally settings. The key comes from the
//! `MACROTALLY_API_KEY` environment variable or the JSON config file written by
//! `macrotally --setup`. The resolved [`Config`] is passed explicitly into the
//! pipeline; nothing below `main` reads the environment or the filesystem.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "MACROTALLY_API_KEY";
/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "MACROTALLY_CONFIG";

const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured; run `macrotally --setup <API_KEY>` or set MACROTALLY_API_KEY")]
    MissingApiKey,

    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Whether this is a usage problem the user fixes by running setup
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ConfigError::MissingApiKey)
    }
}

/// Tunables for lookup and mass resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grams assumed per unit when no table unit or portion applies
    pub default_grams: f64,
    /// FoodData Central API root
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// FoodData Central data types to search
    pub data_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_grams: 100.0,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            data_types: vec!["Foundation".to_string(), "SR Legacy".to_string()],
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_grams.is_finite() || self.default_grams <= 0.0 {
            return Err(ConfigError::InvalidSetting(format!(
                "default_grams must be positive (got {})",
                self.default_grams
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// On-disk config file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub settings: Settings,
}

impl StoredConfig {
    /// Read the config file; `None` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the config file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Resolved configuration handed to the tally pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub settings: Settings,
}

impl Config {
    /// Combine config sources; the environment key wins over the file
    pub fn resolve(stored: Option<StoredConfig>, env_key: Option<String>) -> Result<Self, ConfigError> {
        let stored = stored.unwrap_or_default();
        stored.settings.validate()?;

        let api_key = env_key
            .into_iter()
            .chain(stored.api_key)
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            settings: stored.settings,
        })
    }

    /// Load from the environment and the config file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let stored = StoredConfig::load(path)?;
        Self::resolve(stored, env::var(API_KEY_ENV).ok())
    }
}

/// Location of the config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("macrotally").join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Store `api_key` in the config file at `path`, keeping existing settings
pub fn save_api_key(path: &Path, api_key: &str) -> Result<StoredConfig, ConfigError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }

    let mut stored = StoredConfig::load(path)?.unwrap_or_default();
    stored.api_key = Some(api_key.to_string());
    stored.save(path)?;
    tracing::info!(path = %path.display(), "saved API key");
    Ok(stored)
}
