use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::assistant::{DEFAULT_HISTORY_LIMIT, ResponderDelays};
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
    #[serde(default = "default_draft_delay_ms")]
    pub draft_delay_ms: u64,
    #[serde(default = "default_optimization_delay_ms")]
    pub optimization_delay_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Fixed seed for template selection; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    #[serde(default = "default_seed_demo_messages")]
    pub seed_demo_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            assistant: AssistantConfig::default(),
            inbox: InboxConfig::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: default_response_delay_ms(),
            analysis_delay_ms: default_analysis_delay_ms(),
            draft_delay_ms: default_draft_delay_ms(),
            optimization_delay_ms: default_optimization_delay_ms(),
            history_limit: default_history_limit(),
            rng_seed: None,
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            seed_demo_messages: default_seed_demo_messages(),
        }
    }
}

impl AssistantConfig {
    pub fn delays(&self) -> ResponderDelays {
        ResponderDelays {
            response: Duration::from_millis(self.response_delay_ms),
            analysis: Duration::from_millis(self.analysis_delay_ms),
            draft: Duration::from_millis(self.draft_delay_ms),
            optimization: Duration::from_millis(self.optimization_delay_ms),
        }
    }
}

// Default value functions
fn default_database_path() -> String {
    // This is a fallback - actual profile will be determined at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("pocket.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/pocket/pocket.db".to_string()
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_response_delay_ms() -> u64 {
    1200
}

fn default_analysis_delay_ms() -> u64 {
    2500
}

fn default_draft_delay_ms() -> u64 {
    1800
}

fn default_optimization_delay_ms() -> u64 {
    1500
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_seed_demo_messages() -> bool {
    true
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and database paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_or_create(&config_path, profile)
    }

    /// Load `path`, writing profile defaults there first if it does not exist.
    ///
    /// A `database_path` set in the file is kept; the profile default only
    /// fills in when the key is absent.
    pub fn load_or_create(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if !path.exists() {
            let mut config = Config {
                database_path: Self::default_database_path_for_profile(profile),
                ..Config::default()
            };
            config.save_to_path(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&contents)?;
        let table: toml::Table = toml::from_str(&contents)?;
        if !table.contains_key("database_path") {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        Ok(config)
    }

    /// Load configuration from an explicit file; the database path is taken as written
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to file
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("pocket.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/pocket-dev/pocket.db".to_string(),
                utils::Profile::Prod => "~/.local/share/pocket/pocket.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }
}
