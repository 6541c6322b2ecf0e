//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::LeagueSettings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Directory of static front end files served for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            static_dir: None,
        }
    }
}

/// League settings used until an admin saves their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default = "default_league_name")]
    pub name: String,

    #[serde(default = "default_one")]
    pub season: u32,

    #[serde(default = "default_one")]
    pub week: u32,
}

fn default_league_name() -> String {
    "Community League".to_string()
}

fn default_one() -> u32 {
    1
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            name: default_league_name(),
            season: default_one(),
            week: default_one(),
        }
    }
}

impl LeagueConfig {
    pub fn initial_settings(&self) -> LeagueSettings {
        LeagueSettings::new(self.name.clone(), self.season, self.week)
    }
}

/// Admin access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for admin routes. Empty disables them.
    #[serde(default)]
    pub token: String,
}

impl AdminConfig {
    pub fn enabled(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub league: LeagueConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            league: LeagueConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.league.season == 0 {
            return Err(ConfigError::ValidationError(
                "League season must be at least 1".to_string(),
            ));
        }

        if self.league.week == 0 {
            return Err(ConfigError::ValidationError(
                "League week must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
