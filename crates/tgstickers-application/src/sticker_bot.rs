//! Conversation with the sticker bot.
//!
//! The remote offers no direct way to list the packs an account created,
//! so we ask the bot to add a sticker and read the pack choices it offers
//! as reply-keyboard buttons. This depends on the bot's wording and is
//! best effort.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tgstickers_core::STICKER_BOT;
use tgstickers_core::config::StickersConfig;
use tgstickers_core::error::{Result, StickersError};
use tgstickers_core::gateway::{BotMessage, TelegramGateway};

const CANCEL: &str = "/cancel";
const ADD_STICKER: &str = "/addsticker";
const CHOOSE_PACK_PROMPT: &str = "Choose the sticker pack you're interested in.";

/// Client for the sticker bot account.
#[derive(Clone)]
pub struct StickerBotClient {
    gateway: Arc<dyn TelegramGateway>,
    poll_delay: Duration,
    poll_attempts: u32,
}

impl StickerBotClient {
    pub fn new(gateway: Arc<dyn TelegramGateway>, config: &StickersConfig) -> Self {
        Self {
            gateway,
            poll_delay: Duration::from_millis(config.owned_pack_poll_delay_ms),
            poll_attempts: config.owned_pack_poll_attempts.max(1),
        }
    }

    /// Sends a text command to the bot.
    pub async fn send_command(&self, text: &str) -> Result<()> {
        tracing::debug!("Sending '{}' to @{}", text, STICKER_BOT);
        self.gateway.send_message(STICKER_BOT, text).await
    }

    /// Uploads a local file and sends it to the bot as a document.
    pub async fn send_sticker_file(&self, path: &Path) -> Result<()> {
        if !tokio::fs::try_exists(path).await? {
            return Err(StickersError::FileNotFound(path.to_path_buf()));
        }

        tracing::info!("Uploading {} to @{}", path.display(), STICKER_BOT);
        let uploaded = self.gateway.upload_file(path).await?;
        self.gateway.send_file(STICKER_BOT, &uploaded).await
    }

    /// Short-names of the packs the signed-in account owns, in the order the
    /// bot lists them.
    pub async fn owned_pack_short_names(&self) -> Result<Vec<String>> {
        tracing::info!("Checking which sticker packs are owned by the current user");

        self.send_command(CANCEL).await?;
        self.send_command(ADD_STICKER).await?;

        let prompt = self.wait_for_pack_prompt().await?;
        let short_names = Self::keyboard_labels(&prompt);

        self.send_command(CANCEL).await?;
        tracing::info!("User owns {} sticker packs", short_names.len());
        Ok(short_names)
    }

    async fn wait_for_pack_prompt(&self) -> Result<BotMessage> {
        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_delay).await;

            let newest = self
                .gateway
                .recent_messages(STICKER_BOT, 1)
                .await?
                .into_iter()
                .next();

            match newest {
                Some(message) if message.text == CHOOSE_PACK_PROMPT => {
                    tracing::debug!("Bot offered pack choices after {} polls", attempt);
                    return Ok(message);
                }
                _ => tracing::debug!("Bot has not offered pack choices yet (poll {})", attempt),
            }
        }

        tracing::warn!(
            "@{} did not offer pack choices after {} polls",
            STICKER_BOT,
            self.poll_attempts
        );
        Err(StickersError::unexpected(format!(
            "@{} did not list owned sticker packs",
            STICKER_BOT
        )))
    }

    fn keyboard_labels(message: &BotMessage) -> Vec<String> {
        message
            .keyboard
            .iter()
            .flatten()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeGateway;
    use tempfile::TempDir;

    fn config(attempts: u32) -> StickersConfig {
        StickersConfig {
            owned_pack_poll_delay_ms: 1,
            owned_pack_poll_attempts: attempts,
            ..Default::default()
        }
    }

    fn message(text: &str, keyboard: Option<Vec<Vec<&str>>>) -> BotMessage {
        BotMessage {
            id: 1,
            text: text.to_string(),
            keyboard: keyboard.map(|rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(str::to_string).collect())
                    .collect()
            }),
        }
    }

    #[tokio::test]
    async fn test_owned_packs_in_row_order() {
        let gateway = FakeGateway::new();
        gateway.queue_bot_messages(vec![
            vec![message("Hello", None)],
            vec![message(
                CHOOSE_PACK_PROMPT,
                Some(vec![vec!["PackA", "PackB"], vec!["PackC"]]),
            )],
        ]);
        let bot = StickerBotClient::new(gateway.clone(), &config(10));

        let names = bot.owned_pack_short_names().await.unwrap();

        assert_eq!(names, vec!["PackA", "PackB", "PackC"]);
        let sent: Vec<String> = gateway.sent_messages().into_iter().map(|(_, t)| t).collect();
        assert_eq!(sent, vec!["/cancel", "/addsticker", "/cancel"]);
        assert!(gateway.sent_messages().iter().all(|(to, _)| to == STICKER_BOT));
    }

    #[tokio::test]
    async fn test_missing_keyboard_is_empty() {
        let gateway = FakeGateway::new();
        gateway.queue_bot_messages(vec![vec![message(CHOOSE_PACK_PROMPT, None)]]);
        let bot = StickerBotClient::new(gateway, &config(3));

        assert!(bot.owned_pack_short_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_keyboard_is_empty() {
        let gateway = FakeGateway::new();
        gateway.queue_bot_messages(vec![vec![message(CHOOSE_PACK_PROMPT, Some(vec![]))]]);
        let bot = StickerBotClient::new(gateway, &config(3));

        assert!(bot.owned_pack_short_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_polling_gives_up() {
        let gateway = FakeGateway::new();
        gateway.queue_bot_messages(vec![vec![message("Something else", None)]]);
        let bot = StickerBotClient::new(gateway, &config(3));

        let err = bot.owned_pack_short_names().await.unwrap_err();
        assert!(matches!(err, StickersError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_send_missing_file() {
        let gateway = FakeGateway::new();
        let bot = StickerBotClient::new(gateway.clone(), &config(1));

        let err = bot
            .send_sticker_file(Path::new("/definitely/not/here.webp"))
            .await
            .unwrap_err();
        assert!(matches!(err, StickersError::FileNotFound(_)));
        assert!(gateway.sent_files().is_empty());
    }

    #[tokio::test]
    async fn test_send_file_uploads_then_sends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.webp");
        std::fs::write(&path, b"image").unwrap();

        let gateway = FakeGateway::new();
        let bot = StickerBotClient::new(gateway.clone(), &config(1));
        bot.send_sticker_file(&path).await.unwrap();

        let sent = gateway.sent_files();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "new.webp");
    }
}
