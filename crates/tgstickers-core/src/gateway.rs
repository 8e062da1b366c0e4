//! Boundary to the external protocol client.
//!
//! Nothing in this workspace speaks the messaging protocol. A concrete
//! client (or a test fake) implements [`TelegramGateway`], and the sign-in
//! machine, pack service and sticker-bot client only ever see this trait.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::SignInResponse;
use crate::error::Result;
use crate::sticker::StickerSetResponse;

/// Where a piece of media can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaLocation {
    /// A sticker document. The file reference may expire, in which case the
    /// pack metadata has to be refreshed before downloading again.
    Document {
        id: i64,
        access_hash: i64,
        file_reference: Vec<u8>,
    },
    /// The dedicated thumbnail of a sticker set.
    PackThumb { short_name: String, version: i32 },
}

/// Handle to a file uploaded to the remote service, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: i64,
    pub name: String,
    pub parts: i32,
}

/// A message received from another account (the sticker bot).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotMessage {
    pub id: i64,
    pub text: String,
    /// Reply keyboard attached to the message, as rows of button labels.
    pub keyboard: Option<Vec<Vec<String>>>,
}

/// The protocol client operations the core relies on.
#[async_trait]
pub trait TelegramGateway: Send + Sync {
    /// Opens a session with the remote service.
    async fn connect(&self) -> Result<()>;

    /// Whether the session kept by the protocol client is already authorized.
    async fn is_authorized(&self) -> Result<bool>;

    /// Starts sign-in with a phone number (digits, country code first).
    async fn sign_in_phone(&self, phone: &str) -> Result<SignInResponse>;

    /// Completes sign-in with the verification code.
    async fn sign_in_code(&self, phone: &str, code: &str) -> Result<SignInResponse>;

    /// Completes sign-in with the two-factor password.
    async fn sign_in_password(&self, password: &str) -> Result<SignInResponse>;

    /// Asks the remote to send the verification code again.
    async fn send_code_request(&self, phone: &str) -> Result<SignInResponse>;

    /// Fetches a sticker set by short-name.
    async fn get_sticker_set(&self, short_name: &str) -> Result<StickerSetResponse>;

    /// Downloads media to `destination`, overwriting it.
    async fn download_file(&self, location: &MediaLocation, destination: &Path) -> Result<()>;

    /// Uploads a local file.
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile>;

    /// Sends a text message to an account (by username).
    async fn send_message(&self, target: &str, text: &str) -> Result<()>;

    /// Sends an uploaded file to an account as a document.
    async fn send_file(&self, target: &str, file: &UploadedFile) -> Result<()>;

    /// The most recent messages in the conversation with `target`, newest first.
    async fn recent_messages(&self, target: &str, limit: usize) -> Result<Vec<BotMessage>>;
}
