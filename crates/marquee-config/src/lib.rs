pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiKeySource, Config, DatabaseConfig, ImportConfig, LoggingConfig, OmdbConfig, ServerConfig, OMDB_API_KEY_ENV};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
