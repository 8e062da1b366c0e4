//! Owned pack list repository.
//!
//! File location: `{user_dir}/owned_packs.json`

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use version_migrate::Migrator;

use tgstickers_core::error::{Result, StickersError};
use tgstickers_core::sticker::{OwnedPackList, OwnedPacksRepository};

use crate::dto::create_owned_packs_migrator;
use crate::paths::StickersPaths;

/// Stores the signed-in user's owned pack short-names as a versioned JSON file.
pub struct FileOwnedPacksRepository {
    path: PathBuf,
    migrator: Migrator,
}

impl FileOwnedPacksRepository {
    const ENTITY_NAME: &'static str = "owned_packs";

    pub fn new(paths: &StickersPaths) -> Result<Self> {
        let path = paths
            .owned_packs_file()
            .map_err(|e| StickersError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a repository backed by an explicit file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            migrator: create_owned_packs_migrator(),
        }
    }
}

#[async_trait]
impl OwnedPacksRepository for FileOwnedPacksRepository {
    async fn load(&self) -> Result<Option<OwnedPackList>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            StickersError::io(format!("Failed to read owned pack list: {}", e))
        })?;

        let json_value: serde_json::Value = serde_json::from_str(&content)?;

        let list: OwnedPackList = self
            .migrator
            .load_flat_from(Self::ENTITY_NAME, json_value)
            .map_err(|e| {
                StickersError::migration(format!("Failed to migrate owned pack list: {}", e))
            })?;

        Ok(Some(list))
    }

    async fn save(&self, list: &OwnedPackList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StickersError::io(format!("Failed to create directory: {}", e)))?;
        }

        let serialized = self
            .migrator
            .save_domain_flat(Self::ENTITY_NAME, list.clone())?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .await
            .map_err(|e| StickersError::io(format!("Failed to write owned pack list: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StickersError::io(format!("Failed to replace owned pack list: {}", e)))?;

        Ok(())
    }
}
