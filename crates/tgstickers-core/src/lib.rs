pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod sticker;

// Re-export common error type
pub use error::{Result, StickersError};

/// Username of the official bot that manages sticker packs.
pub const STICKER_BOT: &str = "Stickers";
