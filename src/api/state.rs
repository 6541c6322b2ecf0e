use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::LeagueSettings;
use crate::storage::{LeagueStore, StorageConfig, StorageError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LeagueStore>,
    /// Settings served until an admin saves their own
    pub default_settings: Arc<LeagueSettings>,
    pub admin_token: Arc<str>,
    pub cors_origin: Arc<str>,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(LeagueStore::new(StorageConfig::new(config.data_dir.clone()))),
            default_settings: Arc::new(config.league.initial_settings()),
            admin_token: Arc::from(config.admin.token.trim()),
            cors_origin: Arc::from(config.server.cors_origin.as_str()),
            static_dir: config.server.static_dir.clone(),
        }
    }

    /// Current league settings, stored or default.
    pub fn settings(&self) -> Result<LeagueSettings, StorageError> {
        self.store.settings_or(&self.default_settings)
    }
}
