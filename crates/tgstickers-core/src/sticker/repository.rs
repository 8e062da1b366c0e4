//! Cache repository traits.

use std::path::PathBuf;

use async_trait::async_trait;

use super::model::{OwnedPackList, StickerPack};
use crate::error::Result;

/// Local cache of pack metadata and media, keyed by short-name.
#[async_trait]
pub trait PackCacheRepository: Send + Sync {
    /// Whether metadata for the pack is cached.
    async fn contains(&self, short_name: &str) -> Result<bool>;

    /// Loads cached metadata. Fails with `StickersError::CacheMiss` when absent.
    async fn load(&self, short_name: &str) -> Result<StickerPack>;

    /// Persists metadata, replacing any previous entry.
    async fn save(&self, pack: &StickerPack) -> Result<()>;

    /// Removes the whole cache entry, media included.
    async fn delete(&self, short_name: &str) -> Result<()>;

    /// Short-names of every cached pack, sorted.
    async fn list_short_names(&self) -> Result<Vec<String>>;

    /// Directory holding the pack's media files. May not exist yet.
    fn media_dir(&self, short_name: &str) -> PathBuf;
}

/// The cached list of packs owned by the signed-in user.
#[async_trait]
pub trait OwnedPacksRepository: Send + Sync {
    /// Returns `None` when nothing has been cached yet.
    async fn load(&self) -> Result<Option<OwnedPackList>>;

    async fn save(&self, list: &OwnedPackList) -> Result<()>;
}
