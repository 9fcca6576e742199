use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use marquee_config::{Config, CredentialStore, PathManager};
use marquee_core::{ContentStore, InMemoryContentStore, SqliteContentStore};
use marquee_sources::{MetadataProvider, OmdbClient, OmdbSettings};
use tracing::debug;

pub mod catalog;
pub mod config;
pub mod prompts;
pub mod serve;

/// Paths, config and credentials shared by every command
pub struct Context {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        Self::from_paths(PathManager::default(), true)
    }

    /// Skips validation so `config init --force` can replace a broken file
    pub fn load_unvalidated() -> Result<Self> {
        Self::from_paths(PathManager::default(), false)
    }

    pub fn from_paths(paths: PathManager, validate: bool) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        if validate {
            config
                .validate()
                .map_err(|e| eyre!("Invalid config {}: {}", config_file.display(), e))?;
        }

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn provider(&self) -> Result<Arc<dyn MetadataProvider>> {
        let settings = OmdbSettings::from_config(&self.config, &self.credentials)
            .map_err(|e| eyre!("{}", e))?;
        let client = OmdbClient::new(settings).wrap_err("Failed to build the OMDB client")?;
        Ok(Arc::new(client))
    }

    pub async fn store(&self, in_memory: bool) -> Result<Arc<dyn ContentStore>> {
        if in_memory {
            debug!("Using in-memory catalog");
            return Ok(Arc::new(InMemoryContentStore::new()));
        }

        self.paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
        let url = self.config.database_url(&self.paths);
        debug!(url = %url, "Opening catalog database");
        let store = SqliteContentStore::connect(&url, self.config.database.max_connections)
            .await
            .wrap_err_with(|| format!("Failed to open catalog database {}", url))?;
        Ok(Arc::new(store))
    }

    /// Explicit value, else the configured default
    pub fn category_id(&self, explicit: Option<i64>) -> Result<i64> {
        explicit
            .or(self.config.import.default_category_id)
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                eyre!("A positive category id is required: pass --category or set import.default_category_id")
            })
    }

    pub fn language_id(&self, explicit: Option<i64>) -> Result<i64> {
        let id = explicit.unwrap_or(self.config.import.default_language_id);
        if id > 0 {
            Ok(id)
        } else {
            Err(eyre!("Language id must be positive, got {}", id))
        }
    }
}
