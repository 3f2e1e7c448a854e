//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::Message as InboundMessage;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout for getUpdates, in seconds
const POLL_TIMEOUT: i64 = 30;

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    result: T,
}

/// Telegram bot adapter
///
/// The chat id is used as the sender identifier, so replies land in the
/// chat the command came from.
pub struct TelegramAdapter {
    token: String,
    client: Client,
    base_url: String,
    info: BotInfo,
    offset: AtomicI64,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            base_url: base_url.into(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "prick-bot".to_string(),
                username: "prick_bot".to_string(),
            },
            offset: AtomicI64::new(0),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, method)
    }

    async fn post<Req: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        request: &Req,
    ) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let result: BotInfoResponse = self.post("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: result.id.to_string(),
            name: result.first_name,
            username: result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.post("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
    }

    /// Convert text updates into inbound events; other updates are dropped
    pub fn to_events(updates: &[Update]) -> Vec<InboundMessage> {
        updates.iter()
            .filter_map(|u| u.message.as_ref())
            .filter_map(|m| {
                let text = m.text.as_deref()?;
                Some(InboundMessage::new(m.chat.id.to_string(), text).with_platform("telegram"))
            })
            .collect()
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", self.token.chars().take(8).collect::<String>());
        Ok(())
    }

    async fn receive(&self) -> Result<Vec<InboundMessage>, BotError> {
        let offset = self.offset.load(Ordering::SeqCst);
        let updates = self.get_updates(offset, POLL_TIMEOUT).await?;

        if !updates.is_empty() {
            tracing::info!("Received {} updates", updates.len());
        }

        if let Some(next) = Self::get_next_offset(&updates) {
            self.offset.store(next, Ordering::SeqCst);
        }

        Ok(Self::to_events(&updates))
    }

    async fn send_message(&self, recipient: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        tracing::debug!("Sending to {}: {}", recipient, text);

        let result: MessageResult = self
            .post("sendMessage", &SendMessageRequest { chat_id: recipient, text })
            .await?;

        Ok(result.message_id.to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
