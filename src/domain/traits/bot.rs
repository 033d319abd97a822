use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, SentMessage};

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Run the transport, pushing every inbound message into `inbound`.
    /// Returns when the transport stops or the receiver is dropped.
    async fn start(&self, inbound: mpsc::Sender<Message>) -> Result<(), BotError>;

    /// Send `text` to a chat, optionally as a reply to one of its messages
    async fn send_reply(
        &self,
        chat_id: &str,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
