//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;
use crate::domain::entities::Message;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Sender identifier for every console event
pub const CONSOLE_SENDER: &str = "console";

type LineSource = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// Console bot adapter for local development
///
/// Each input line is one inbound event; replies go to stdout.
pub struct ConsoleAdapter {
    info: BotInfo,
    lines: Mutex<LineSource>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "prick-bot".to_string(),
                username: "console".to_string(),
            },
            lines: Mutex::new(reader.lines()),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn receive(&self) -> Result<Vec<Message>, BotError> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Ok(Vec::new()),
            Ok(Some(line)) => Ok(vec![Message::new(CONSOLE_SENDER, line).with_platform("console")]),
            Ok(None) => Err(BotError::Disconnected),
            Err(e) => Err(BotError::Internal(format!("stdin: {}", e))),
        }
    }

    async fn send_message(&self, _recipient: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
