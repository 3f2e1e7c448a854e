//! Application layer errors

use thiserror::Error;

use crate::infrastructure::llm::LLMError;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Inbound stream closed")]
    Disconnected,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
///
/// Every variant is recovered inside the router and turned into a reply.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Malformed or incomplete arguments; the payload is the reply text.
    #[error("{0}")]
    Usage(String),

    /// The completion API call failed for any reason.
    #[error("External call failed: {0}")]
    ExternalCall(#[from] LLMError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CommandError {
    pub fn usage(text: impl Into<String>) -> Self {
        Self::Usage(text.into())
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
