//! Telegram adapter - Long-polling transport for the Bot API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Message as InboundMessage, SentMessage, User as Sender};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Pause after a failed poll before retrying
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct Response<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> Response<T> {
    fn into_result(self) -> Result<T, BotError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Network(format!(
                "Telegram API error: {}",
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

impl From<Message> for InboundMessage {
    fn from(message: Message) -> Self {
        let raw = serde_json::to_value(&message).ok();
        let mut inbound = InboundMessage::new(message.chat.id.to_string(), message.text)
            .with_id(message.message_id.to_string())
            .with_platform("telegram");
        if let Some(from) = message.from {
            let mut sender = Sender::new(from.id.to_string());
            sender.username = from.username;
            sender.first_name = from.first_name;
            sender.is_bot = from.is_bot;
            inbound = inbound.with_sender(sender);
        }
        if let Some(raw) = raw {
            inbound = inbound.with_raw(raw);
        }
        inbound
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
    poll_timeout: u64,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, poll_timeout: u64) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "xgram".to_string(),
                username: "xgram_bot".to_string(),
            },
            poll_timeout,
        }
    }

    /// First characters of the token, for logs
    fn token_hint(&self) -> String {
        self.token.chars().take(8).collect()
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, BotError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        data.into_result()
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let me: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;
        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username,
        };
        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout,
            allowed_updates: vec!["message".to_string()],
        };
        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }

    /// Publish the command list shown in the Telegram client
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|(command, description)| Command { command, description })
                .collect(),
        };
        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self, inbound: mpsc::Sender<InboundMessage>) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", self.token_hint());

        let mut offset = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!("Polling failed: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            if let Some(next) = Self::get_next_offset(&updates) {
                offset = next;
            }

            for message in updates.into_iter().filter_map(|update| update.message) {
                if inbound.send(message.into()).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    async fn send_reply(
        &self,
        chat_id: &str,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError> {
        #[derive(Serialize)]
        struct ReplyParameters {
            message_id: i64,
        }

        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_parameters: Option<ReplyParameters>,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let request = SendMessageRequest {
            chat_id,
            text,
            reply_parameters: reply_to
                .and_then(|id| id.parse().ok())
                .map(|message_id| ReplyParameters { message_id }),
        };
        let sent: Message = self.call("sendMessage", &request).await?;

        Ok(SentMessage {
            id: sent.message_id.to_string(),
            chat_id: sent.chat.id.to_string(),
            text: sent.text.unwrap_or_default(),
        })
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_deserialization() {
        let updates: Response<Vec<Update>> = serde_json::from_str(
            r#"{"ok":true,"result":[{"update_id":7,"message":{"message_id":3,
                "from":{"id":11,"is_bot":false,"username":"alice"},
                "chat":{"id":-100},"text":"/add 1 2"}}]}"#,
        )
        .unwrap();
        let updates = updates.into_result().unwrap();
        assert_eq!(TelegramAdapter::get_next_offset(&updates), Some(8));

        let message: InboundMessage = updates[0].message.clone().unwrap().into();
        assert_eq!(message.id, "3");
        assert_eq!(message.chat_id, "-100");
        assert_eq!(message.text(), "/add 1 2");
        assert_eq!(message.sender.unwrap().username.as_deref(), Some("alice"));
        assert_eq!(message.platform, "telegram");
    }

    #[test]
    fn test_token_hint_respects_char_boundaries() {
        let adapter = TelegramAdapter::new("1234567é:abc", 30);
        assert_eq!(adapter.token_hint(), "1234567é");
        assert_eq!(TelegramAdapter::new("12", 30).token_hint(), "12");
    }

    #[test]
    fn test_error_response() {
        let response: Response<bool> =
            serde_json::from_str(r#"{"ok":false,"description":"Unauthorized"}"#).unwrap();
        assert!(matches!(response.into_result(), Err(BotError::Network(msg)) if msg.contains("Unauthorized")));
        assert_eq!(TelegramAdapter::get_next_offset(&[]), None);
    }
}
