use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration, stored in `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StickersConfig {
    /// Overrides the default cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Upper bound on simultaneous media transfers for one pack.
    pub max_concurrent_downloads: usize,
    /// Delay between polls while waiting for the sticker bot to answer.
    pub owned_pack_poll_delay_ms: u64,
    /// Number of polls before giving up on the sticker bot.
    pub owned_pack_poll_attempts: u32,
    /// Default tracing filter, e.g. `info` or `tgstickers=debug`.
    pub log_level: String,
}

impl Default for StickersConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_concurrent_downloads: 8,
            owned_pack_poll_delay_ms: 100,
            owned_pack_poll_attempts: 100,
            log_level: "info".to_string(),
        }
    }
}
