use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaName;
use crate::gateway::MediaLocation;

/// A single sticker document within a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    pub doc_id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    pub dc_id: i32,
    /// Opaque, time-limited credential needed to download the document.
    pub file_reference: Vec<u8>,
    /// Size in bytes.
    pub size: i64,
    /// Original file name attribute; empty when the document has none.
    pub file_name: String,
    pub width: i32,
    pub height: i32,
    /// Emoji associated with this sticker, sorted by character.
    pub emojis: String,
    /// Short-name of the owning pack.
    pub pack_short_name: String,
}

impl Sticker {
    pub fn location(&self) -> MediaLocation {
        MediaLocation::Document {
            id: self.doc_id,
            access_hash: self.access_hash,
            file_reference: self.file_reference.clone(),
        }
    }

    pub fn media_name(&self) -> MediaName {
        MediaName::new(&self.file_name, &self.mime_type)
    }

    /// File name of this sticker inside its pack's cache directory.
    pub fn cache_file_name(&self) -> String {
        self.media_name().file_name_for(&self.doc_id.to_string())
    }
}

/// The dedicated thumbnail of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackThumbnail {
    pub pack_short_name: String,
    pub width: i32,
    pub height: i32,
    pub size: i32,
    pub dc_id: i32,
    pub version: i32,
}

impl PackThumbnail {
    pub fn location(&self) -> MediaLocation {
        MediaLocation::PackThumb {
            short_name: self.pack_short_name.clone(),
            version: self.version,
        }
    }
}

/// A sticker pack as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerPack {
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    /// Unique identifier of the pack on the remote service and in the cache.
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
    pub is_animated: bool,
    pub thumbnail: Option<PackThumbnail>,
    pub stickers: Vec<Sticker>,
}

impl StickerPack {
    /// Extension used for the pack thumbnail (and the fallback sticker).
    pub fn thumbnail_extension(&self) -> &'static str {
        if self.is_animated { "tgs" } else { "webp" }
    }

    /// File name of the thumbnail the UI should display, relative to the
    /// pack's cache directory.
    ///
    /// Packs without a dedicated thumbnail fall back to their first sticker.
    /// Returns `None` only for an empty pack without a thumbnail.
    pub fn thumbnail_file_name(&self) -> Option<String> {
        if self.thumbnail.is_some() {
            return Some(format!("thumb.{}", self.thumbnail_extension()));
        }
        self.stickers
            .first()
            .map(|s| format!("{}.{}", s.doc_id, self.thumbnail_extension()))
    }
}

/// Short-names of the packs owned by the signed-in user, in the order the
/// sticker bot lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedPackList {
    pub short_names: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedPackList {
    pub fn new(short_names: Vec<String>) -> Self {
        Self {
            short_names,
            updated_at: Utc::now(),
        }
    }
}
