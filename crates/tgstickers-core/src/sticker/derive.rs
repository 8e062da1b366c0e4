//! Building [`StickerPack`]s out of remote responses.

use std::collections::HashMap;

use super::model::{PackThumbnail, Sticker, StickerPack};
use super::response::{EmojiGroup, StickerSetInfo, StickerSetResponse, ThumbDescriptor};

/// Inverts emoji groups into a per-document emoji string.
///
/// Each document's string is the characters of every group it appears in,
/// sorted. Characters repeated across groups are kept, and multi-codepoint
/// emoji are split into their codepoints by the sort.
pub fn emoji_assignments(groups: &[EmojiGroup]) -> HashMap<i64, String> {
    let mut assignments: HashMap<i64, String> = HashMap::new();
    for group in groups {
        for doc_id in &group.documents {
            let entry = assignments.entry(*doc_id).or_default();
            let mut chars: Vec<char> = entry.chars().chain(group.emoticon.chars()).collect();
            chars.sort_unstable();
            *entry = chars.into_iter().collect();
        }
    }
    assignments
}

/// Extracts the dedicated pack thumbnail, if the set has one.
///
/// Only a flat raster thumbnail (`PhotoSize`) is understood. Any other first
/// descriptor is treated as no thumbnail, and the pack falls back to its
/// first sticker.
pub fn derive_thumbnail(set: &StickerSetInfo) -> Option<PackThumbnail> {
    let version = set.thumb_version?;
    let first = set.thumbs.as_ref()?.first()?;

    match first {
        ThumbDescriptor::PhotoSize {
            width,
            height,
            size,
            ..
        } => Some(PackThumbnail {
            pack_short_name: set.short_name.clone(),
            width: *width,
            height: *height,
            size: *size,
            dc_id: set.thumb_dc_id.unwrap_or_default(),
            version,
        }),
        other => {
            tracing::warn!(
                "Unsupported thumbnail descriptor for pack '{}': {}",
                set.short_name,
                other.shape()
            );
            None
        }
    }
}

/// Builds a pack from a fetched sticker set.
pub fn generate(response: &StickerSetResponse) -> StickerPack {
    let emojis = emoji_assignments(&response.packs);
    let short_name = &response.set.short_name;

    let stickers = response
        .documents
        .iter()
        .map(|doc| {
            let (width, height) = doc.image_size().unwrap_or_default();
            Sticker {
                doc_id: doc.id,
                access_hash: doc.access_hash,
                mime_type: doc.mime_type.clone(),
                dc_id: doc.dc_id,
                file_reference: doc.file_reference.clone(),
                size: doc.size,
                file_name: doc.file_name().unwrap_or_default().to_string(),
                width,
                height,
                emojis: emojis.get(&doc.id).cloned().unwrap_or_default(),
                pack_short_name: short_name.clone(),
            }
        })
        .collect();

    StickerPack {
        id: response.set.id,
        access_hash: response.set.access_hash,
        title: response.set.title.clone(),
        short_name: short_name.clone(),
        count: response.set.count,
        hash: response.set.hash,
        is_animated: response.set.animated,
        thumbnail: derive_thumbnail(&response.set),
        stickers,
    }
}
