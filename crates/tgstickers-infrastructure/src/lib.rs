pub mod config_service;
pub mod dto;
pub mod file_owned_packs_repository;
pub mod file_pack_repository;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::file_owned_packs_repository::FileOwnedPacksRepository;
pub use crate::file_pack_repository::FilePackCacheRepository;
pub use crate::paths::StickersPaths;
