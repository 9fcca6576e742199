use anyhow::Result;
use std::path::{Path, PathBuf};

/// Overrides the platform config dir; set in container images
pub const BASE_PATH_ENV: &str = "MARQUEE_BASE_PATH";

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var(BASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("marquee");

        Ok(Self::with_base(base_dir))
    }

    pub fn from_docker_env() -> Self {
        Self::with_base(container_base_path())
    }

    /// Config files at the base, data and logs in subdirectories
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("marquee.db")
    }

    /// Default SQLite url; `mode=rwc` creates the file on first connect
    pub fn default_database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database_file().display())
    }

    pub fn server_log_file(&self) -> PathBuf {
        self.log_dir.join("marquee.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    /// Container layout when MARQUEE_BASE_PATH is set, platform config dir otherwise
    fn default() -> Self {
        if std::env::var_os(BASE_PATH_ENV).is_some() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::with_base(PathBuf::from("/srv/marquee"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/marquee/config.toml"));
        assert_eq!(paths.credentials_file(), PathBuf::from("/srv/marquee/credentials.toml"));
        assert_eq!(paths.database_file(), PathBuf::from("/srv/marquee/data/marquee.db"));
        assert_eq!(paths.server_log_file(), PathBuf::from("/srv/marquee/logs/marquee.log"));
        assert_eq!(
            paths.default_database_url(),
            "sqlite:///srv/marquee/data/marquee.db?mode=rwc"
        );
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path().join("marquee"));
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
