//! Application layer for tgstickers.
//!
//! Use cases that coordinate the protocol gateway, the local cache and
//! the media downloader.

pub mod downloader;
pub mod pack_service;
pub mod sign_in;
pub mod sticker_bot;

#[cfg(test)]
mod test_support;

pub use downloader::{DownloadReport, MediaDownloader, MediaItem};
pub use pack_service::{GetPackOptions, PackService};
pub use sign_in::{CredentialPrompt, MAX_CODE_ATTEMPTS, MAX_PHONE_ATTEMPTS, run_interactive};
pub use sticker_bot::StickerBotClient;
