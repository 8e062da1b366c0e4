//! In-memory gateway shared by the application tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tgstickers_core::auth::SignInResponse;
use tgstickers_core::error::{Result, StickersError};
use tgstickers_core::gateway::{BotMessage, MediaLocation, TelegramGateway, UploadedFile};
use tgstickers_core::sticker::{
    DocumentAttribute, EmojiGroup, RemoteDocument, StickerSetInfo, StickerSetResponse,
    ThumbDescriptor,
};

#[derive(Default)]
pub struct FakeGateway {
    sets: Mutex<HashMap<String, StickerSetResponse>>,
    fetches: Mutex<HashMap<String, usize>>,
    failing_documents: Mutex<HashSet<i64>>,
    failing_thumbnails: AtomicBool,
    downloads: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    download_delay_ms: AtomicU64,
    sign_in_script: Mutex<VecDeque<SignInResponse>>,
    sign_in_calls: Mutex<Vec<String>>,
    authorized: Mutex<bool>,
    bot_inbox: Mutex<VecDeque<Vec<BotMessage>>>,
    sent: Mutex<Vec<(String, String)>>,
    sent_files: Mutex<Vec<UploadedFile>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_set(&self, response: StickerSetResponse) {
        self.sets
            .lock()
            .unwrap()
            .insert(response.set.short_name.clone(), response);
    }

    pub fn fetch_count(&self, short_name: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(short_name)
            .copied()
            .unwrap_or(0)
    }

    pub fn fail_document(&self, id: i64) {
        self.failing_documents.lock().unwrap().insert(id);
    }

    pub fn fail_thumbnails(&self) {
        self.failing_thumbnails.store(true, Ordering::SeqCst);
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn set_download_delay_ms(&self, delay: u64) {
        self.download_delay_ms.store(delay, Ordering::SeqCst);
    }

    pub fn script_sign_in(&self, responses: Vec<SignInResponse>) {
        self.sign_in_script.lock().unwrap().extend(responses);
    }

    pub fn set_authorized(&self, authorized: bool) {
        *self.authorized.lock().unwrap() = authorized;
    }

    /// Operation names of the sign-in calls received, in order.
    pub fn sign_in_calls(&self) -> Vec<String> {
        self.sign_in_calls.lock().unwrap().clone()
    }

    /// Queues the result of successive `recent_messages` polls. The last
    /// queued batch keeps being returned once the queue runs dry.
    pub fn queue_bot_messages(&self, batches: Vec<Vec<BotMessage>>) {
        self.bot_inbox.lock().unwrap().extend(batches);
    }

    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_files(&self) -> Vec<UploadedFile> {
        self.sent_files.lock().unwrap().clone()
    }

    fn next_sign_in(&self, call: &str) -> Result<SignInResponse> {
        self.sign_in_calls.lock().unwrap().push(call.to_string());
        self.sign_in_script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| StickersError::unexpected("sign-in script exhausted"))
    }
}

#[async_trait]
impl TelegramGateway for FakeGateway {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool> {
        Ok(*self.authorized.lock().unwrap())
    }

    async fn sign_in_phone(&self, _phone: &str) -> Result<SignInResponse> {
        self.next_sign_in("phone")
    }

    async fn sign_in_code(&self, _phone: &str, _code: &str) -> Result<SignInResponse> {
        self.next_sign_in("code")
    }

    async fn sign_in_password(&self, _password: &str) -> Result<SignInResponse> {
        self.next_sign_in("password")
    }

    async fn send_code_request(&self, _phone: &str) -> Result<SignInResponse> {
        self.next_sign_in("resend")
    }

    async fn get_sticker_set(&self, short_name: &str) -> Result<StickerSetResponse> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(short_name.to_string())
            .or_default() += 1;
        self.sets
            .lock()
            .unwrap()
            .get(short_name)
            .cloned()
            .ok_or_else(|| StickersError::unexpected(format!("no such set: {}", short_name)))
    }

    async fn download_file(&self, location: &MediaLocation, destination: &Path) -> Result<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.download_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let failure = match location {
            MediaLocation::Document { id, .. } => self
                .failing_documents
                .lock()
                .unwrap()
                .contains(id)
                .then(|| format!("document {} unavailable", id)),
            MediaLocation::PackThumb { .. } => self
                .failing_thumbnails
                .load(Ordering::SeqCst)
                .then(|| "thumbnail unavailable".to_string()),
        };
        let outcome = match failure {
            Some(message) => Err(StickersError::connection(message)),
            None => tokio::fs::write(destination, b"media").await.map_err(Into::into),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn upload_file(&self, path: &Path) -> Result<UploadedFile> {
        Ok(UploadedFile {
            id: 1,
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            parts: 1,
        })
    }

    async fn send_message(&self, target: &str, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((target.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_file(&self, _target: &str, file: &UploadedFile) -> Result<()> {
        self.sent_files.lock().unwrap().push(file.clone());
        Ok(())
    }

    async fn recent_messages(&self, _target: &str, limit: usize) -> Result<Vec<BotMessage>> {
        let mut inbox = self.bot_inbox.lock().unwrap();
        let batch = if inbox.len() > 1 {
            inbox.pop_front().unwrap_or_default()
        } else {
            inbox.front().cloned().unwrap_or_default()
        };
        Ok(batch.into_iter().take(limit).collect())
    }
}

/// A remote sticker set with `count` static stickers and an optional
/// dedicated thumbnail.
pub fn sample_set(short_name: &str, count: usize, with_thumbnail: bool) -> StickerSetResponse {
    let documents: Vec<RemoteDocument> = (0..count)
        .map(|i| RemoteDocument {
            id: 1000 + i as i64,
            access_hash: 7,
            mime_type: "image/webp".to_string(),
            dc_id: 2,
            file_reference: vec![1, 2, 3],
            size: 2048,
            attributes: vec![
                DocumentAttribute::ImageSize {
                    width: 512,
                    height: 512,
                },
                DocumentAttribute::Filename {
                    file_name: "sticker.webp".to_string(),
                },
            ],
        })
        .collect();

    let (thumbs, thumb_version) = if with_thumbnail {
        (
            Some(vec![ThumbDescriptor::PhotoSize {
                kind: "s".to_string(),
                width: 100,
                height: 100,
                size: 512,
            }]),
            Some(1),
        )
    } else {
        (None, None)
    };

    StickerSetResponse {
        set: StickerSetInfo {
            id: 42,
            access_hash: 43,
            title: format!("{} title", short_name),
            short_name: short_name.to_string(),
            count: count as i32,
            hash: 44,
            animated: false,
            thumbs,
            thumb_version,
            thumb_dc_id: Some(2),
        },
        packs: vec![EmojiGroup {
            emoticon: "😀".to_string(),
            documents: documents.iter().map(|d| d.id).collect(),
        }],
        documents,
    }
}
