pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use teloxide::types::{ChatId, KeyboardMarkup, ParseMode};

/// An inbound webhook update.
///
/// Only the fields the bot reads are modelled, all others are ignored, so a
/// trimmed payload like `{"message":{"chat":{"id":1},"text":"/start"}}` is
/// still a valid update.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: IncomingChat,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub id: Option<u64>,
    pub first_name: String,
}

/// A message to send back to a chat
#[derive(Debug, Clone)]
pub struct Reply {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Option<KeyboardMarkup>,
}

/// Outbound side of the bot. The webhook never awaits anything else.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, reply: &Reply) -> Result<()>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every reply instead of talking to Telegram.
    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<Reply>>,
        pub fail: bool,
    }

    impl RecordingSender {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub async fn replies(&self) -> Vec<Reply> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        async fn send(&self, reply: &Reply) -> Result<()> {
            self.sent.lock().await.push(reply.clone());
            if self.fail {
                anyhow::bail!("Telegram is unreachable");
            }
            Ok(())
        }
    }
}
