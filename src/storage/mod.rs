//! Filesystem storage for league data.
//!
//! Layout under the data directory:
//! - `normalized/*.jsonl`: one JSON Lines file per entity type
//! - `state/league_settings.json`: the league settings document

mod jsonl;
mod league;

pub use jsonl::*;
pub use league::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.state_dir().join("league_settings.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.normalized_dir(), PathBuf::from("/data/normalized"));
        assert_eq!(config.state_dir(), PathBuf::from("/data/state"));
        assert_eq!(
            config.settings_path(),
            PathBuf::from("/data/state/league_settings.json")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_not_found_message() {
        let err = StorageError::NotFound {
            entity: "game",
            id: "g1".to_string(),
        };
        assert_eq!(err.to_string(), "game not found: g1");
    }
}
