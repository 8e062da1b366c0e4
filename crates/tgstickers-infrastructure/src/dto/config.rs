//! StickersConfig DTOs and migrations

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use tgstickers_core::config::StickersConfig;

fn default_max_concurrent_downloads() -> usize {
    StickersConfig::default().max_concurrent_downloads
}

fn default_poll_delay_ms() -> u64 {
    StickersConfig::default().owned_pack_poll_delay_ms
}

fn default_poll_attempts() -> u32 {
    StickersConfig::default().owned_pack_poll_attempts
}

fn default_log_level() -> String {
    StickersConfig::default().log_level
}

/// V1.0.0: Initial configuration schema.
///
/// Every field is optional in the file so a hand-edited `config.toml` only
/// needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct StickersConfigV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
    #[serde(default = "default_poll_delay_ms")]
    pub owned_pack_poll_delay_ms: u64,
    #[serde(default = "default_poll_attempts")]
    pub owned_pack_poll_attempts: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl IntoDomain<StickersConfig> for StickersConfigV1_0_0 {
    fn into_domain(self) -> StickersConfig {
        StickersConfig {
            cache_dir: self.cache_dir,
            // Zero permits would stall every download.
            max_concurrent_downloads: self.max_concurrent_downloads.max(1),
            owned_pack_poll_delay_ms: self.owned_pack_poll_delay_ms,
            owned_pack_poll_attempts: self.owned_pack_poll_attempts.max(1),
            log_level: self.log_level,
        }
    }
}

impl FromDomain<StickersConfig> for StickersConfigV1_0_0 {
    fn from_domain(config: StickersConfig) -> Self {
        StickersConfigV1_0_0 {
            cache_dir: config.cache_dir,
            max_concurrent_downloads: config.max_concurrent_downloads,
            owned_pack_poll_delay_ms: config.owned_pack_poll_delay_ms,
            owned_pack_poll_attempts: config.owned_pack_poll_attempts,
            log_level: config.log_level,
        }
    }
}

/// Creates and configures a Migrator instance for StickersConfig entities.
///
/// # Example
///
/// ```ignore
/// let migrator = create_config_migrator();
/// let config: StickersConfig = migrator.load_flat_from("config", toml_value)?;
/// ```
pub fn create_config_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let config_path = version_migrate::Migrator::define("config")
        .from::<StickersConfigV1_0_0>()
        .into_with_save::<StickersConfig>();

    migrator
        .register(config_path)
        .expect("Failed to register config migration path");

    migrator
}
