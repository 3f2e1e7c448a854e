use chrono::{DateTime, Utc};

/// Represents one inbound message event
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    /// Opaque sender identifier, also the reply recipient
    pub sender: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender: sender.into(),
            body: body.into(),
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Normalized text the router matches against
    pub fn text(&self) -> &str {
        self.body.trim()
    }
}
