use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::bot::Command;
use crate::config::Config;
use crate::platform::{Reply, ReplySender};

/// Sends replies through the Telegram Bot API
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySender for TelegramSender {
    async fn send(&self, reply: &Reply) -> Result<()> {
        let mut request = self.bot.send_message(reply.chat_id, reply.text.clone());
        if let Some(mode) = reply.parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(keyboard.clone());
        }
        request
            .await
            .with_context(|| format!("Failed to send message to chat {}", reply.chat_id))?;
        Ok(())
    }
}

/// One-off calls made before the server starts listening. None of them is
/// fatal: the bot still answers webhooks if Telegram is unreachable here.
///
/// Returns the bot username to match `/start@username` against.
pub async fn prepare(bot: &Bot, config: &Config) -> Option<String> {
    let username = match config.bot_username() {
        Some(name) => Some(name.to_string()),
        None => match bot.get_me().await {
            Ok(me) => me.user.username.clone(),
            Err(e) => {
                warn!("Could not look up bot username: {}", e);
                None
            }
        },
    };

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to publish bot commands: {}", e);
    }

    match config.webhook_url() {
        Ok(Some(url)) => match bot.set_webhook(url.clone()).await {
            Ok(_) => info!("Webhook registered at {}", url),
            Err(e) => warn!("Failed to register webhook at {}: {}", url, e),
        },
        Ok(None) => info!("No public_url configured, leaving webhook registration as is"),
        Err(e) => warn!("Skipping webhook registration: {:#}", e),
    }

    username
}
