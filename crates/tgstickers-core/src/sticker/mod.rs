//! Sticker pack domain models, derivation from remote responses, and the
//! cache repository traits.

mod derive;
mod media;
mod model;
mod repository;
mod response;

pub use derive::{derive_thumbnail, emoji_assignments, generate};
pub use media::{MediaName, extension_for_mime};
pub use model::{OwnedPackList, PackThumbnail, Sticker, StickerPack};
pub use repository::{OwnedPacksRepository, PackCacheRepository};
pub use response::{
    DocumentAttribute, EmojiGroup, RemoteDocument, StickerSetInfo, StickerSetResponse,
    ThumbDescriptor,
};
