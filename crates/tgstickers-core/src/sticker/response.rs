//! The shape of a sticker set as the protocol client returns it.

/// Header of a sticker set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StickerSetInfo {
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
    pub animated: bool,
    pub thumbs: Option<Vec<ThumbDescriptor>>,
    pub thumb_version: Option<i32>,
    pub thumb_dc_id: Option<i32>,
}

/// One emoji and the documents it is associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiGroup {
    pub emoticon: String,
    pub documents: Vec<i64>,
}

/// Thumbnail descriptor variants the remote may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbDescriptor {
    /// A flat raster thumbnail stored remotely.
    PhotoSize {
        kind: String,
        width: i32,
        height: i32,
        size: i32,
    },
    /// A raster thumbnail with its bytes inlined.
    CachedSize {
        kind: String,
        width: i32,
        height: i32,
        bytes: Vec<u8>,
    },
    /// A tiny preview with its bytes inlined.
    StrippedSize { kind: String, bytes: Vec<u8> },
    /// A vector outline.
    PathSize { kind: String, bytes: Vec<u8> },
}

impl ThumbDescriptor {
    pub fn shape(&self) -> &'static str {
        match self {
            ThumbDescriptor::PhotoSize { .. } => "photo size",
            ThumbDescriptor::CachedSize { .. } => "cached size",
            ThumbDescriptor::StrippedSize { .. } => "stripped size",
            ThumbDescriptor::PathSize { .. } => "path size",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAttribute {
    Filename { file_name: String },
    ImageSize { width: i32, height: i32 },
    Sticker { alt: String },
    Animated,
}

/// A document belonging to the set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteDocument {
    pub id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    pub dc_id: i32,
    pub file_reference: Vec<u8>,
    pub size: i64,
    pub attributes: Vec<DocumentAttribute>,
}

impl RemoteDocument {
    pub fn file_name(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            DocumentAttribute::Filename { file_name } => Some(file_name.as_str()),
            _ => None,
        })
    }

    /// `(width, height)` from the image size attribute.
    pub fn image_size(&self) -> Option<(i32, i32)> {
        self.attributes.iter().find_map(|a| match a {
            DocumentAttribute::ImageSize { width, height } => Some((*width, *height)),
            _ => None,
        })
    }
}

/// Full response to a "get sticker set" request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StickerSetResponse {
    pub set: StickerSetInfo,
    pub packs: Vec<EmojiGroup>,
    pub documents: Vec<RemoteDocument>,
}
