//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, SentMessage, User};
use crate::domain::traits::{Bot, BotInfo};

const CHAT_ID: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
                username: "console".to_string(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new("xgram")
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self, inbound: mpsc::Sender<Message>) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode), type /start");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
        {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let message = Message::from_text(CHAT_ID, line)
                .with_sender(User::new("console").with_username("you"))
                .with_platform("console");
            if inbound.send(message).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn send_reply(
        &self,
        chat_id: &str,
        text: &str,
        _reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError> {
        println!("[BOT] {}", text);
        Ok(SentMessage {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        })
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
