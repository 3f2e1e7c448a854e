use async_trait::async_trait;
use crate::application::errors::StorageError;

/// Store trait - abstraction for the variable key/value store
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
