//! Naming of media files in the cache.

/// Known MIME types and the extension their files are stored with.
/// `application/octet-stream` maps to no extension so the original file
/// name decides.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/webp", "webp"),
    ("application/x-tgsticker", "tgs"),
    ("text/plain", "txt"),
    ("application/octet-stream", ""),
];

/// Looks up the extension for a MIME type.
///
/// Unknown types use their subtype (`image/png` -> `png`).
pub fn extension_for_mime(mime: &str) -> &str {
    if let Some((_, ext)) = MIME_EXTENSIONS.iter().find(|(m, _)| *m == mime) {
        return ext;
    }
    match mime.find('/') {
        Some(idx) => &mime[idx + 1..],
        None => mime,
    }
}

/// The name and MIME type of a remote document, used to pick a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaName {
    file_name: String,
    mime: String,
}

impl MediaName {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
        }
    }

    /// Extension without the dot; may be empty.
    pub fn extension(&self) -> &str {
        if !self.mime.is_empty() {
            let ext = extension_for_mime(&self.mime);
            if !ext.is_empty() {
                return ext;
            }
        }
        match self.file_name.rfind('.') {
            Some(idx) => &self.file_name[idx + 1..],
            None => "",
        }
    }

    /// `<stem>.<ext>`, or just `<stem>` when there is no extension.
    pub fn file_name_for(&self, stem: &str) -> String {
        let ext = self.extension();
        if ext.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, ext)
        }
    }
}
