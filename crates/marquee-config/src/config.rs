use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::credentials::CredentialStore;

/// Environment variable that overrides every stored OMDB key
pub const OMDB_API_KEY_ENV: &str = "MARQUEE_OMDB_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_OMDB_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    Credentials,
    ConfigFile,
}

impl ApiKeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment",
            ApiKeySource::Credentials => "credentials file",
            ApiKeySource::ConfigFile => "config file",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OmdbConfig {
    /// Prefer `marquee config omdb` (credentials file) or the env var over this field
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite url; defaults to data_dir/marquee.db
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_language_id")]
    pub default_language_id: i64,
    #[serde(default)]
    pub default_category_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    5
}

fn default_language_id() -> i64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_language_id: default_language_id(),
            default_category_id: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            omdb: OmdbConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            import: ImportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != API_KEY_PLACEHOLDER
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file when present, defaults otherwise
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.omdb.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url cannot be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("omdb.base_url must be an http(s) url, got '{}'", base_url));
        }
        if self.omdb.timeout_secs == 0 {
            return Err(anyhow::anyhow!("omdb.timeout_secs must be greater than zero"));
        }
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server.port must be greater than zero"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("database.max_connections must be greater than zero"));
        }
        if self.import.default_language_id <= 0 {
            return Err(anyhow::anyhow!("import.default_language_id must be a positive id"));
        }
        if let Some(category_id) = self.import.default_category_id {
            if category_id <= 0 {
                return Err(anyhow::anyhow!("import.default_category_id must be a positive id"));
            }
        }
        Ok(())
    }

    /// API key from, in order: the environment, the credentials file, config.toml
    pub fn resolve_api_key(&self, credentials: &CredentialStore) -> Option<String> {
        self.resolve_api_key_with(std::env::var(OMDB_API_KEY_ENV).ok(), credentials)
    }

    pub fn resolve_api_key_with(
        &self,
        env_value: Option<String>,
        credentials: &CredentialStore,
    ) -> Option<String> {
        self.api_key_with_source(env_value, credentials).map(|(key, _)| key)
    }

    /// Resolved key plus where it came from
    pub fn api_key_with_source(
        &self,
        env_value: Option<String>,
        credentials: &CredentialStore,
    ) -> Option<(String, ApiKeySource)> {
        let candidates = [
            (env_value, ApiKeySource::Environment),
            (credentials.get_omdb_api_key().cloned(), ApiKeySource::Credentials),
            (Some(self.omdb.api_key.clone()), ApiKeySource::ConfigFile),
        ];
        candidates.into_iter().find_map(|(key, source)| {
            key.filter(|k| is_usable_key(k))
                .map(|k| (k.trim().to_string(), source))
        })
    }

    pub fn require_api_key(&self, credentials: &CredentialStore) -> anyhow::Result<String> {
        self.resolve_api_key(credentials).ok_or_else(|| {
            anyhow::anyhow!(
                "OMDB API key is not configured. Run 'marquee config omdb' or set {}",
                OMDB_API_KEY_ENV
            )
        })
    }

    pub fn is_omdb_configured(&self, credentials: &CredentialStore) -> bool {
        self.resolve_api_key(credentials).is_some()
    }

    /// Configured database url, or the default under the data directory
    pub fn database_url(&self, paths: &crate::PathManager) -> String {
        self.database
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| paths.default_database_url())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn empty_credentials() -> CredentialStore {
        CredentialStore::new(PathBuf::from("/tmp/marquee-test-missing-credentials.toml"))
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.omdb.api_key = "test_key".to_string();
        config.server.port = 9090;
        config.import.default_category_id = Some(4);

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.omdb.api_key, "test_key");
        assert_eq!(loaded.omdb.base_url, "https://www.omdbapi.com/");
        assert_eq!(loaded.server.port, 9090);
        assert_eq!(loaded.import.default_category_id, Some(4));
        assert_eq!(loaded.import.default_language_id, 1);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[omdb]\napi_key = \"k\"\n").unwrap();
        assert_eq!(config.omdb.timeout_secs, 30);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_minimal_file_is_valid() {
        let config: Config = toml::from_str("[omdb]\napi_key = \"k\"\n").unwrap();
        assert!(config.validate().is_ok());

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.omdb.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.omdb.base_url = default_base_url();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 8080;
        config.import.default_language_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_source() {
        let mut config = Config::default();
        config.omdb.api_key = "from_config".to_string();
        let mut credentials = empty_credentials();

        let source = |c: &Config, creds: &CredentialStore, env: Option<&str>| {
            c.api_key_with_source(env.map(str::to_string), creds).map(|(_, s)| s)
        };
        assert_eq!(source(&config, &credentials, None), Some(ApiKeySource::ConfigFile));
        credentials.set_omdb_api_key("from_credentials".to_string());
        assert_eq!(source(&config, &credentials, None), Some(ApiKeySource::Credentials));
        assert_eq!(source(&config, &credentials, Some("k")), Some(ApiKeySource::Environment));
        assert_eq!(ApiKeySource::Credentials.as_str(), "credentials file");
    }

    #[test]
    fn test_placeholder_key_is_not_configured() {
        let config = Config::default();
        let credentials = empty_credentials();
        assert_eq!(config.resolve_api_key_with(None, &credentials), None);
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut config = Config::default();
        config.omdb.api_key = "from_config".to_string();
        let mut credentials = empty_credentials();

        assert_eq!(
            config.resolve_api_key_with(None, &credentials).as_deref(),
            Some("from_config")
        );

        credentials.set_omdb_api_key("from_credentials".to_string());
        assert_eq!(
            config.resolve_api_key_with(None, &credentials).as_deref(),
            Some("from_credentials")
        );

        assert_eq!(
            config
                .resolve_api_key_with(Some(" from_env ".to_string()), &credentials)
                .as_deref(),
            Some("from_env")
        );

        // Blank env value falls through
        assert_eq!(
            config.resolve_api_key_with(Some(String::new()), &credentials).as_deref(),
            Some("from_credentials")
        );
    }

    #[test]
    fn test_database_url_default() {
        let paths = crate::PathManager::with_base(PathBuf::from("/srv/marquee"));
        let mut config = Config::default();
        assert_eq!(config.database_url(&paths), "sqlite:///srv/marquee/data/marquee.db?mode=rwc");

        config.database.url = Some("sqlite::memory:".to_string());
        assert_eq!(config.database_url(&paths), "sqlite::memory:");
    }
}
