use std::sync::Arc;

use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

use crate::menu::{menu_keyboard, MenuEntry};
use crate::platform::{IncomingMessage, IncomingUpdate, Reply, ReplySender};

/// Used when an update carries no sender
const FALLBACK_NAME: &str = "ወዳጄ";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "Show the main menu.")]
    Start,
}

impl Command {
    /// Parse the leading `/command[@bot]` token. Anything after the first
    /// whitespace (e.g. a deep-link payload) is ignored.
    pub fn from_text(text: &str, bot_username: Option<&str>) -> Option<Command> {
        let token = text.split_whitespace().next()?;
        if !token.starts_with('/') {
            return None;
        }
        Command::parse(token, bot_username.unwrap_or("")).ok()
    }
}

/// What a single message asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Welcome { name: String },
    Menu(MenuEntry),
    Unrecognized,
}

impl Action {
    pub fn classify(message: &IncomingMessage, bot_username: Option<&str>) -> Action {
        let Some(text) = message.text.as_deref() else {
            return Action::Unrecognized;
        };

        if let Some(Command::Start) = Command::from_text(text, bot_username) {
            let name = message
                .from
                .as_ref()
                .map(|sender| sender.first_name.clone())
                .unwrap_or_else(|| FALLBACK_NAME.to_string());
            return Action::Welcome { name };
        }

        match MenuEntry::from_label(text) {
            Some(entry) => Action::Menu(entry),
            None => Action::Unrecognized,
        }
    }
}

pub fn welcome_text(name: &str) -> String {
    format!(
        "ሰላም {}! 👋\n\n\
         ወደ ማገገሚያ ድጋፍ ቦት እንኳን በደህና መጣህ። ብቻህን አይደለህም።\n\n\
         ከታች ካሉት ቁልፎች አንዱን በመምረጥ ምክር፣ ማበረታቻ ወይም አስቸኳይ እርዳታ ማግኘት ትችላለህ።",
        name
    )
}

/// How a dispatch ended. The webhook answers 200 for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Ignored,
    SendFailed,
}

/// Maps updates to at most one reply and sends it
pub struct Dispatcher {
    sender: Arc<dyn ReplySender>,
    bot_username: Option<String>,
}

impl Dispatcher {
    pub fn new(sender: Arc<dyn ReplySender>, bot_username: Option<String>) -> Self {
        Self {
            sender,
            bot_username,
        }
    }

    /// The reply an update should produce, without sending anything
    pub fn plan(&self, update: &IncomingUpdate) -> Option<Reply> {
        let message = update.message.as_ref()?;
        let chat_id = ChatId(message.chat.id);

        match Action::classify(message, self.bot_username.as_deref()) {
            Action::Welcome { name } => Some(Reply {
                chat_id,
                text: welcome_text(&name),
                parse_mode: None,
                keyboard: Some(menu_keyboard()),
            }),
            Action::Menu(entry) => Some(Reply {
                chat_id,
                text: entry.reply().to_string(),
                parse_mode: entry.parse_mode(),
                keyboard: None,
            }),
            Action::Unrecognized => None,
        }
    }

    /// Send the planned reply, if any. Send errors are logged and swallowed:
    /// a failed webhook would make Telegram redeliver and double the reply.
    pub async fn dispatch(&self, update: &IncomingUpdate) -> Outcome {
        if let Some(message) = &update.message {
            let (sender_name, sender_id) = match &message.from {
                Some(from) => (from.first_name.as_str(), from.id.unwrap_or_default()),
                None => ("<unknown>", 0),
            };
            info!(
                "Message in chat {} from {} ({}): {}",
                message.chat.id,
                sender_name,
                sender_id,
                message.text.as_deref().unwrap_or("<no text>")
            );
        }

        let Some(reply) = self.plan(update) else {
            debug!("No handler for update {:?}", update.update_id);
            return Outcome::Ignored;
        };

        match self.sender.send(&reply).await {
            Ok(()) => Outcome::Sent,
            Err(e) => {
                error!("Failed to reply in chat {}: {:#}", reply.chat_id, e);
                Outcome::SendFailed
            }
        }
    }
}
