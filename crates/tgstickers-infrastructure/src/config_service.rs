//! Configuration service implementation.
//!
//! Loads `config.toml` through the versioned config migrator. A missing file
//! is replaced by the defaults so users have something to edit.

use std::path::{Path, PathBuf};

use tokio::fs;

use tgstickers_core::config::StickersConfig;
use tgstickers_core::error::{Result, StickersError};

use crate::dto::create_config_migrator;
use crate::paths::StickersPaths;

/// Reads and writes the application configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    const ENTITY_NAME: &'static str = "config";

    pub fn new(paths: &StickersPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| StickersError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, writing the defaults first if the file is missing.
    pub async fn load_or_init(&self) -> Result<StickersConfig> {
        if !fs::try_exists(&self.path).await? {
            let config = StickersConfig::default();
            self.save(&config).await?;
            tracing::info!("Wrote default configuration to {}", self.path.display());
            return Ok(config);
        }
        self.load().await
    }

    /// Loads the configuration file. Fails if it does not exist.
    pub async fn load(&self) -> Result<StickersConfig> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            StickersError::io(format!(
                "Failed to read config file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let toml_value: toml::Value = toml::from_str(&content).map_err(|e| {
            StickersError::config(format!(
                "Failed to parse config file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        create_config_migrator()
            .load_flat_from(Self::ENTITY_NAME, toml_value)
            .map_err(|e| {
                StickersError::config(format!(
                    "Failed to migrate config file '{}': {}",
                    self.path.display(),
                    e
                ))
            })
    }

    pub async fn save(&self, config: &StickersConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // The migrator emits JSON; convert it to TOML for the config file.
        let json_str = create_config_migrator().save_domain_flat(Self::ENTITY_NAME, config.clone())?;
        let json_value: serde_json::Value = serde_json::from_str(&json_str)?;
        let toml_value = toml::Value::try_from(json_value)?;
        let toml_str = toml::to_string_pretty(&toml_value)?;

        fs::write(&self.path, toml_str).await.map_err(|e| {
            StickersError::io(format!(
                "Failed to write config file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StickersPaths::new(Some(temp_dir.path()));
        let service = ConfigService::new(&paths).unwrap();

        let config = service.load_or_init().await.unwrap();
        assert_eq!(config, StickersConfig::default());

        let content = std::fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
        assert!(content.contains("version = \"1.0.0\""));
        assert!(content.contains("max_concurrent_downloads = 8"));
    }

    #[tokio::test]
    async fn test_existing_file_is_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "version = \"1.0.0\"\ncache_dir = \"/srv/stickers\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigService::with_path(path).load_or_init().await.unwrap();
        assert_eq!(config.cache_dir, Some(PathBuf::from("/srv/stickers")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_concurrent_downloads, 8);
    }

    #[tokio::test]
    async fn test_save_round_trips_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = StickersConfig {
            cache_dir: Some(PathBuf::from("/data/cache")),
            owned_pack_poll_attempts: 5,
            ..Default::default()
        };
        service.save(&config).await.unwrap();

        assert_eq!(service.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = ConfigService::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, StickersError::Config(_)));
    }
}
