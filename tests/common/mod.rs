//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::sync::{Mutex, Once};

use async_trait::async_trait;
use tokio::sync::mpsc;

use xgram::{Bot, BotError, BotInfo, Message, SentMessage};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Bot that records every reply instead of sending it
pub struct RecordingBot {
    info: BotInfo,
    replies: Mutex<Vec<SentMessage>>,
    reply_targets: Mutex<Vec<Option<String>>>,
    inbox: Mutex<Vec<Message>>,
}

impl RecordingBot {
    pub fn new(username: &str) -> Self {
        Self {
            info: BotInfo {
                id: "1".to_string(),
                name: "Test Bot".to_string(),
                username: username.to_string(),
            },
            replies: Mutex::new(Vec::new()),
            reply_targets: Mutex::new(Vec::new()),
            inbox: Mutex::new(Vec::new()),
        }
    }

    /// A bot whose transport delivers `messages` and then stops
    pub fn with_inbox(username: &str, messages: Vec<Message>) -> Self {
        let bot = Self::new(username);
        *bot.inbox.lock().unwrap() = messages;
        bot
    }

    /// Texts of all replies, in send order
    pub fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|sent| sent.text.clone())
            .collect()
    }

    pub fn reply_targets(&self) -> Vec<Option<String>> {
        self.reply_targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn start(&self, inbound: mpsc::Sender<Message>) -> Result<(), BotError> {
        let messages = std::mem::take(&mut *self.inbox.lock().unwrap());
        for message in messages {
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
        reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError> {
        let mut replies = self.replies.lock().unwrap();
        let sent = SentMessage {
            id: format!("sent-{}", replies.len()),
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        };
        replies.push(sent.clone());
        self.reply_targets
            .lock()
            .unwrap()
            .push(reply_to.map(str::to_string));
        Ok(sent)
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// A text message in chat `42`
pub fn text(body: &str) -> Message {
    Message::from_text("42", body).with_id("100")
}
