//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of everything written to disk.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new fields with defaults)
//!
//! ### StickerPack Version History
//! - **1.0.0**: Initial schema
//! - **1.1.0**: Stickers carry `dc_id` and the original `file_name`
//!
//! ### OwnedPackList Version History
//! - **1.0.0**: Initial schema
//!
//! ### StickersConfig Version History
//! - **1.0.0**: Initial schema

mod config;
mod owned_packs;
mod pack;

pub use config::{StickersConfigV1_0_0, create_config_migrator};
pub use owned_packs::{OwnedPackListV1_0_0, create_owned_packs_migrator};
pub use pack::{
    PackThumbnailV1_0_0, StickerPackV1_0_0, StickerPackV1_1_0, StickerV1_0_0, StickerV1_1_0,
    create_pack_migrator,
};
