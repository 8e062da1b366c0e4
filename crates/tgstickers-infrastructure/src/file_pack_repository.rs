//! Sticker pack cache repository.
//!
//! Each pack gets its own directory under the cache root, holding the
//! versioned metadata document and every downloaded media file.
//!
//! File location: `{cache_root}/{short_name}/{short_name}.json`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use version_migrate::Migrator;

use tgstickers_core::config::StickersConfig;
use tgstickers_core::error::{Result, StickersError};
use tgstickers_core::sticker::{PackCacheRepository, StickerPack};

use crate::dto::create_pack_migrator;
use crate::paths::StickersPaths;

/// File-based pack cache with version migration support.
///
/// - **Atomic writes**: metadata goes to a temp file that is renamed into place,
///   so readers never observe a half-written document
/// - **Pretty JSON**: documents stay readable for manual inspection
pub struct FilePackCacheRepository {
    cache_root: PathBuf,
    migrator: Migrator,
}

impl FilePackCacheRepository {
    const ENTITY_NAME: &'static str = "sticker_pack";

    /// Creates a repository rooted at the configured cache directory, or the
    /// platform default when the configuration does not override it.
    pub fn new(paths: &StickersPaths, config: &StickersConfig) -> Result<Self> {
        let cache_root = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => paths
                .cache_dir()
                .map_err(|e| StickersError::config(e.to_string()))?,
        };
        Ok(Self::with_base_path(cache_root))
    }

    /// Creates a repository with a custom cache root (for testing).
    pub fn with_base_path(cache_root: PathBuf) -> Self {
        Self {
            cache_root,
            migrator: create_pack_migrator(),
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    fn metadata_path(&self, short_name: &str) -> PathBuf {
        self.media_dir(short_name)
            .join(format!("{}.json", short_name))
    }

    /// Rejects names that would escape the cache root.
    fn validate_short_name(short_name: &str) -> Result<()> {
        let is_plain = !short_name.is_empty()
            && short_name != "."
            && short_name != ".."
            && !short_name.contains(['/', '\\']);
        if is_plain {
            Ok(())
        } else {
            Err(StickersError::data_access(format!(
                "Invalid sticker pack short-name: '{}'",
                short_name
            )))
        }
    }

    fn to_pretty_json(&self, pack: &StickerPack) -> Result<String> {
        let json_str = self
            .migrator
            .save_domain_flat(Self::ENTITY_NAME, pack.clone())?;

        // Re-indent; the migrator emits compact JSON.
        let json_value: serde_json::Value = serde_json::from_str(&json_str)?;
        Ok(serde_json::to_string_pretty(&json_value)?)
    }
}

#[async_trait]
impl PackCacheRepository for FilePackCacheRepository {
    async fn contains(&self, short_name: &str) -> Result<bool> {
        Self::validate_short_name(short_name)?;
        Ok(fs::try_exists(self.metadata_path(short_name)).await?)
    }

    async fn load(&self, short_name: &str) -> Result<StickerPack> {
        Self::validate_short_name(short_name)?;
        let path = self.metadata_path(short_name);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StickersError::cache_miss(short_name));
            }
            Err(e) => {
                return Err(StickersError::io(format!(
                    "Failed to read pack metadata '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        let json_value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            StickersError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to parse '{}': {}", path.display(), e),
            }
        })?;

        let pack: StickerPack = self
            .migrator
            .load_flat_from(Self::ENTITY_NAME, json_value)
            .map_err(|e| {
                StickersError::migration(format!(
                    "Failed to migrate pack metadata '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        tracing::debug!("Loaded cached pack '{}' ({} stickers)", short_name, pack.stickers.len());
        Ok(pack)
    }

    async fn save(&self, pack: &StickerPack) -> Result<()> {
        Self::validate_short_name(&pack.short_name)?;
        let path = self.metadata_path(&pack.short_name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StickersError::io(format!(
                    "Failed to create pack directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json_str = self.to_pretty_json(pack)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json_str).await.map_err(|e| {
            StickersError::io(format!(
                "Failed to write temp file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StickersError::io(format!(
                "Failed to rename temp file '{}' to '{}': {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::debug!("Saved pack metadata to {}", path.display());
        Ok(())
    }

    async fn delete(&self, short_name: &str) -> Result<()> {
        Self::validate_short_name(short_name)?;
        let dir = self.media_dir(short_name);

        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::info!("Removed cached pack '{}'", short_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StickersError::io(format!(
                "Failed to remove pack directory '{}': {}",
                dir.display(),
                e
            ))),
        }
    }

    async fn list_short_names(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.cache_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            // Directories with media but no metadata are not cache entries.
            if fs::try_exists(self.metadata_path(&name)).await? {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn media_dir(&self, short_name: &str) -> PathBuf {
        self.cache_root.join(short_name)
    }
}
