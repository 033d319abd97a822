//! Invocation context handed to command handlers

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, SentMessage};
use crate::domain::traits::Bot;

/// Context of one command invocation
#[derive(Clone)]
pub struct CommandContext {
    pub bot: Arc<dyn Bot>,
    pub message: Message,
}

impl CommandContext {
    pub fn new(bot: Arc<dyn Bot>, message: Message) -> Self {
        Self { bot, message }
    }

    /// Reply to the originating message in its chat
    pub async fn reply(&self, text: impl AsRef<str>) -> Result<SentMessage, BotError> {
        self.bot
            .send_reply(&self.message.chat_id, text.as_ref(), Some(self.message.id.as_str()))
            .await
    }

    pub fn chat_id(&self) -> &str {
        &self.message.chat_id
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("bot", &self.bot.bot_info().username)
            .field("message", &self.message)
            .finish()
    }
}
