use async_trait::async_trait;
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::RequestError;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
#[error("failed to deliver message to chat {chat_id}: {source}")]
pub struct NotifyError {
    pub chat_id: i64,
    #[source]
    pub source: RequestError,
}

/// Delivers text to the single configured chat. Failures are returned, never
/// panicked on, so callers can keep going.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip_all)]
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        match self.bot.send_message(self.chat_id, text).await {
            Ok(_) => {
                info!(chat_id = self.chat_id.0, "message sent");
                Ok(())
            }
            Err(source) => {
                warn!(?source, chat_id = self.chat_id.0, "failed to send message");
                Err(NotifyError {
                    chat_id: self.chat_id.0,
                    source,
                })
            }
        }
    }
}
