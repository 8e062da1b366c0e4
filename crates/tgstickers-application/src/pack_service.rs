//! Sticker pack use cases.
//!
//! `PackService` coordinates the remote gateway, the local cache and the
//! media downloader so callers can ask for a pack by short-name and get
//! metadata plus media on disk.

use std::path::PathBuf;
use std::sync::Arc;

use tgstickers_core::config::StickersConfig;
use tgstickers_core::error::Result;
use tgstickers_core::gateway::TelegramGateway;
use tgstickers_core::sticker::{
    OwnedPackList, OwnedPacksRepository, PackCacheRepository, StickerPack, generate,
};
use tokio::fs;

use crate::downloader::{DownloadReport, MediaDownloader, MediaItem};
use crate::sticker_bot::StickerBotClient;

/// How much of a pack `get_pack` should refresh from the remote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPackOptions {
    /// Fetch metadata even when the pack is cached.
    pub refresh_metadata: bool,
    /// Download media again even when the pack is cached.
    pub refresh_media: bool,
}

impl GetPackOptions {
    pub fn cached() -> Self {
        Self::default()
    }

    pub fn refresh_media() -> Self {
        Self {
            refresh_metadata: false,
            refresh_media: true,
        }
    }

    pub fn refresh_all() -> Self {
        Self {
            refresh_metadata: true,
            refresh_media: true,
        }
    }
}

pub struct PackService {
    gateway: Arc<dyn TelegramGateway>,
    cache: Arc<dyn PackCacheRepository>,
    owned_packs: Arc<dyn OwnedPacksRepository>,
    downloader: MediaDownloader,
    bot: StickerBotClient,
}

impl PackService {
    pub fn new(
        gateway: Arc<dyn TelegramGateway>,
        cache: Arc<dyn PackCacheRepository>,
        owned_packs: Arc<dyn OwnedPacksRepository>,
        config: &StickersConfig,
    ) -> Self {
        Self {
            downloader: MediaDownloader::new(gateway.clone(), config.max_concurrent_downloads),
            bot: StickerBotClient::new(gateway.clone(), config),
            gateway,
            cache,
            owned_packs,
        }
    }

    /// Returns the pack, consulting the cache first.
    ///
    /// - `refresh_media` alone: cached metadata (`CacheMiss` if absent), sticker media redownloaded
    /// - cached and no `refresh_metadata`: cached metadata, no network access
    /// - otherwise: fetched, derived, persisted, then all media downloaded
    ///
    /// Media failures surface as `MediaDownload` after every item was
    /// attempted. Metadata persisted before the downloads stays cached.
    pub async fn get_pack(&self, short_name: &str, options: GetPackOptions) -> Result<StickerPack> {
        if options.refresh_media && !options.refresh_metadata {
            let pack = self.cache.load(short_name).await?;
            tracing::info!("Redownloading media of cached pack '{}'", short_name);
            self.download_stickers(&pack).await?;
            return Ok(pack);
        }

        if !options.refresh_metadata && self.cache.contains(short_name).await? {
            tracing::debug!("Cache hit for pack '{}'", short_name);
            return self.cache.load(short_name).await;
        }

        let pack = self.fetch(short_name).await?;
        self.cache.save(&pack).await?;

        let mut items = self.sticker_items(&pack);
        items.extend(self.thumbnail_item(&pack));
        self.download(&pack, items).await?;
        Ok(pack)
    }

    /// Re-fetches and re-derives the pack, persists the new metadata, then
    /// downloads its thumbnail.
    ///
    /// The metadata stays cached and `pack` stays updated when the thumbnail
    /// download fails.
    pub async fn refresh_metadata(&self, pack: &mut StickerPack) -> Result<()> {
        let refreshed = self.fetch(&pack.short_name).await?;
        if refreshed.short_name != pack.short_name {
            tracing::warn!(
                "Pack '{}' came back as '{}'",
                pack.short_name,
                refreshed.short_name
            );
        }
        self.cache.save(&refreshed).await?;
        *pack = refreshed;

        let items: Vec<MediaItem> = self.thumbnail_item(pack).into_iter().collect();
        self.download(pack, items).await
    }

    /// `refresh_metadata`, then redownloads every sticker.
    pub async fn refresh_all(&self, pack: &mut StickerPack) -> Result<()> {
        self.refresh_metadata(pack).await?;
        self.download_stickers(pack).await
    }

    /// The cached image to show for the pack: the dedicated thumbnail, or
    /// the first sticker when there is none.
    pub fn thumbnail_path(&self, pack: &StickerPack) -> Option<PathBuf> {
        pack.thumbnail_file_name()
            .map(|name| self.cache.media_dir(&pack.short_name).join(name))
    }

    /// Owned pack short-names, asking the sticker bot only when nothing is cached.
    pub async fn get_owned_pack_short_names(&self) -> Result<Vec<String>> {
        match self.owned_packs.load().await? {
            Some(list) => Ok(list.short_names),
            None => self.update_owned_pack_short_names().await,
        }
    }

    /// Asks the sticker bot for the owned packs and caches the answer.
    pub async fn update_owned_pack_short_names(&self) -> Result<Vec<String>> {
        let short_names = self.bot.owned_pack_short_names().await?;
        self.owned_packs
            .save(&OwnedPackList::new(short_names.clone()))
            .await?;
        Ok(short_names)
    }

    /// Every owned pack, resolved through the cache in owned order.
    pub async fn get_owned_packs(&self) -> Result<Vec<StickerPack>> {
        let mut packs = Vec::new();
        for short_name in self.get_owned_pack_short_names().await? {
            packs.push(self.get_pack(&short_name, GetPackOptions::cached()).await?);
        }
        Ok(packs)
    }

    pub fn sticker_bot(&self) -> &StickerBotClient {
        &self.bot
    }

    async fn fetch(&self, short_name: &str) -> Result<StickerPack> {
        tracing::info!("Getting sticker set with short-name: {}", short_name);
        let response = self.gateway.get_sticker_set(short_name).await?;
        Ok(generate(&response))
    }

    async fn download_stickers(&self, pack: &StickerPack) -> Result<()> {
        let items = self.sticker_items(pack);
        self.download(pack, items).await
    }

    async fn download(&self, pack: &StickerPack, items: Vec<MediaItem>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(self.cache.media_dir(&pack.short_name)).await?;

        let report: DownloadReport = self.downloader.download_all(items).await;
        report.into_result(&pack.short_name).map(|_| ())
    }

    fn sticker_items(&self, pack: &StickerPack) -> Vec<MediaItem> {
        let dir = self.cache.media_dir(&pack.short_name);
        pack.stickers
            .iter()
            .map(|sticker| MediaItem {
                location: sticker.location(),
                destination: dir.join(sticker.cache_file_name()),
            })
            .collect()
    }

    fn thumbnail_item(&self, pack: &StickerPack) -> Option<MediaItem> {
        let thumbnail = pack.thumbnail.as_ref()?;
        Some(MediaItem {
            location: thumbnail.location(),
            destination: self
                .cache
                .media_dir(&pack.short_name)
                .join(format!("thumb.{}", pack.thumbnail_extension())),
        })
    }
}
