//! StickerPack DTOs and migrations

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use tgstickers_core::sticker::{PackThumbnail, Sticker, StickerPack};

fn encode_file_reference(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

fn decode_file_reference(encoded: &str, doc_id: i64) -> Vec<u8> {
    // A corrupt reference behaves like an expired one: the pack needs a
    // metadata refresh before this sticker can be downloaded again.
    BASE64_STANDARD.decode(encoded).unwrap_or_else(|e| {
        tracing::warn!("Discarding unreadable file reference of document {}: {}", doc_id, e);
        Vec::new()
    })
}

/// Pack thumbnail DTO, shared by all pack versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackThumbnailV1_0_0 {
    pub pack_short_name: String,
    pub width: i32,
    pub height: i32,
    pub size: i32,
    #[serde(default)]
    pub dc_id: i32,
    pub version: i32,
}

impl From<PackThumbnailV1_0_0> for PackThumbnail {
    fn from(dto: PackThumbnailV1_0_0) -> Self {
        PackThumbnail {
            pack_short_name: dto.pack_short_name,
            width: dto.width,
            height: dto.height,
            size: dto.size,
            dc_id: dto.dc_id,
            version: dto.version,
        }
    }
}

impl From<PackThumbnail> for PackThumbnailV1_0_0 {
    fn from(thumb: PackThumbnail) -> Self {
        PackThumbnailV1_0_0 {
            pack_short_name: thumb.pack_short_name,
            width: thumb.width,
            height: thumb.height,
            size: thumb.size,
            dc_id: thumb.dc_id,
            version: thumb.version,
        }
    }
}

/// Sticker DTO V1.0.0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerV1_0_0 {
    pub doc_id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    /// Base64 of the opaque file reference.
    pub file_reference: String,
    pub size: i64,
    pub width: i32,
    pub height: i32,
    pub emojis: String,
    pub pack_short_name: String,
}

/// Sticker DTO V1.1.0.
/// Added the data-center id and the original file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerV1_1_0 {
    pub doc_id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    pub dc_id: i32,
    /// Base64 of the opaque file reference.
    pub file_reference: String,
    pub size: i64,
    pub file_name: String,
    pub width: i32,
    pub height: i32,
    pub emojis: String,
    pub pack_short_name: String,
}

impl From<StickerV1_0_0> for StickerV1_1_0 {
    fn from(old: StickerV1_0_0) -> Self {
        StickerV1_1_0 {
            doc_id: old.doc_id,
            access_hash: old.access_hash,
            mime_type: old.mime_type,
            dc_id: 0,
            file_reference: old.file_reference,
            size: old.size,
            file_name: String::new(),
            width: old.width,
            height: old.height,
            emojis: old.emojis,
            pack_short_name: old.pack_short_name,
        }
    }
}

impl From<StickerV1_1_0> for Sticker {
    fn from(dto: StickerV1_1_0) -> Self {
        Sticker {
            file_reference: decode_file_reference(&dto.file_reference, dto.doc_id),
            doc_id: dto.doc_id,
            access_hash: dto.access_hash,
            mime_type: dto.mime_type,
            dc_id: dto.dc_id,
            size: dto.size,
            file_name: dto.file_name,
            width: dto.width,
            height: dto.height,
            emojis: dto.emojis,
            pack_short_name: dto.pack_short_name,
        }
    }
}

impl From<Sticker> for StickerV1_1_0 {
    fn from(sticker: Sticker) -> Self {
        StickerV1_1_0 {
            file_reference: encode_file_reference(&sticker.file_reference),
            doc_id: sticker.doc_id,
            access_hash: sticker.access_hash,
            mime_type: sticker.mime_type,
            dc_id: sticker.dc_id,
            size: sticker.size,
            file_name: sticker.file_name,
            width: sticker.width,
            height: sticker.height,
            emojis: sticker.emojis,
            pack_short_name: sticker.pack_short_name,
        }
    }
}

/// V1.0.0: Initial sticker pack schema.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct StickerPackV1_0_0 {
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
    pub is_animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PackThumbnailV1_0_0>,
    pub stickers: Vec<StickerV1_0_0>,
}

/// V1.1.0: Stickers carry `dc_id` and `file_name`.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct StickerPackV1_1_0 {
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
    pub is_animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PackThumbnailV1_0_0>,
    pub stickers: Vec<StickerV1_1_0>,
}

/// Migration from StickerPackV1_0_0 to StickerPackV1_1_0.
///
/// The data-center id and file name were not recorded; they default to 0
/// and empty, which makes media naming rely on the MIME type alone.
impl MigratesTo<StickerPackV1_1_0> for StickerPackV1_0_0 {
    fn migrate(self) -> StickerPackV1_1_0 {
        StickerPackV1_1_0 {
            id: self.id,
            access_hash: self.access_hash,
            title: self.title,
            short_name: self.short_name,
            count: self.count,
            hash: self.hash,
            is_animated: self.is_animated,
            thumbnail: self.thumbnail,
            stickers: self.stickers.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<StickerPack> for StickerPackV1_1_0 {
    fn into_domain(self) -> StickerPack {
        StickerPack {
            id: self.id,
            access_hash: self.access_hash,
            title: self.title,
            short_name: self.short_name,
            count: self.count,
            hash: self.hash,
            is_animated: self.is_animated,
            thumbnail: self.thumbnail.map(Into::into),
            stickers: self.stickers.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromDomain<StickerPack> for StickerPackV1_1_0 {
    fn from_domain(pack: StickerPack) -> Self {
        StickerPackV1_1_0 {
            id: pack.id,
            access_hash: pack.access_hash,
            title: pack.title,
            short_name: pack.short_name,
            count: pack.count,
            hash: pack.hash,
            is_animated: pack.is_animated,
            thumbnail: pack.thumbnail.map(Into::into),
            stickers: pack.stickers.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for StickerPack entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `dc_id` and `file_name` to stickers
/// - V1.1.0 → StickerPack: Converts DTO to domain model
pub fn create_pack_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let pack_path = version_migrate::Migrator::define("sticker_pack")
        .from::<StickerPackV1_0_0>()
        .step::<StickerPackV1_1_0>()
        .into_with_save::<StickerPack>();

    migrator
        .register(pack_path)
        .expect("Failed to register sticker_pack migration path");

    migrator
}

#[cfg(test)]
mod migrator_tests {
    use super::*;

    fn sample_pack() -> StickerPack {
        StickerPack {
            id: 1,
            access_hash: 2,
            title: "Test Pack".to_string(),
            short_name: "TestPack".to_string(),
            count: 1,
            hash: 3,
            is_animated: false,
            thumbnail: None,
            stickers: vec![Sticker {
                doc_id: 100,
                access_hash: 200,
                mime_type: "image/webp".to_string(),
                dc_id: 4,
                file_reference: vec![0xde, 0xad, 0xbe, 0xef],
                size: 2048,
                file_name: "sticker.webp".to_string(),
                width: 512,
                height: 512,
                emojis: "😀".to_string(),
                pack_short_name: "TestPack".to_string(),
            }],
        }
    }

    #[test]
    fn test_pack_migration_v1_0_to_domain() {
        let migrator = create_pack_migrator();

        let json_value = serde_json::json!({
            "version": "1.0.0",
            "id": 1,
            "access_hash": 2,
            "title": "Old Pack",
            "short_name": "OldPack",
            "count": 1,
            "hash": 3,
            "is_animated": true,
            "thumbnail": {
                "pack_short_name": "OldPack",
                "width": 100,
                "height": 100,
                "size": 512,
                "version": 7
            },
            "stickers": [{
                "doc_id": 100,
                "access_hash": 200,
                "mime_type": "application/x-tgsticker",
                "file_reference": "AQID",
                "size": 999,
                "width": 512,
                "height": 512,
                "emojis": "😎",
                "pack_short_name": "OldPack"
            }]
        });

        let result: Result<StickerPack, _> = migrator.load_flat_from("sticker_pack", json_value);
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());

        let pack = result.unwrap();
        assert_eq!(pack.short_name, "OldPack");
        assert_eq!(pack.thumbnail.as_ref().unwrap().version, 7);
        assert_eq!(pack.thumbnail.as_ref().unwrap().dc_id, 0);
        assert_eq!(pack.stickers[0].file_reference, vec![1, 2, 3]);
        assert_eq!(pack.stickers[0].file_name, "");
        assert_eq!(pack.stickers[0].dc_id, 0);
        assert_eq!(pack.stickers[0].cache_file_name(), "100.tgs");
    }

    #[test]
    fn test_pack_save_writes_latest_version() {
        let migrator = create_pack_migrator();

        let json_str = migrator
            .save_domain_flat("sticker_pack", sample_pack())
            .unwrap();

        assert!(json_str.contains("\"version\":\"1.1.0\""));
        assert!(json_str.contains("\"short_name\":\"TestPack\""));
        assert!(json_str.contains("\"file_reference\":\"3q2+7w==\""));
    }

    #[test]
    fn test_pack_survives_save_and_load() {
        let migrator = create_pack_migrator();
        let original = sample_pack();

        let json_str = migrator
            .save_domain_flat("sticker_pack", original.clone())
            .unwrap();
        let json_value: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        let loaded: StickerPack = migrator.load_flat_from("sticker_pack", json_value).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_corrupt_file_reference_is_dropped() {
        let migrator = create_pack_migrator();
        let json_value = serde_json::json!({
            "version": "1.1.0",
            "id": 1,
            "access_hash": 2,
            "title": "Pack",
            "short_name": "Pack",
            "count": 1,
            "hash": 3,
            "is_animated": false,
            "stickers": [{
                "doc_id": 100,
                "access_hash": 200,
                "mime_type": "image/webp",
                "dc_id": 2,
                "file_reference": "!!not base64!!",
                "size": 999,
                "file_name": "",
                "width": 512,
                "height": 512,
                "emojis": "",
                "pack_short_name": "Pack"
            }]
        });

        let pack: StickerPack = migrator.load_flat_from("sticker_pack", json_value).unwrap();
        assert!(pack.stickers[0].file_reference.is_empty());
    }
}
