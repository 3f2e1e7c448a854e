//! File-based storage implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::domain::traits::Store;
use crate::application::errors::StorageError;

/// JSON file-based variable store
///
/// The whole mapping lives in memory and is rewritten to disk after every
/// mutation. Writers hold the lock for the duration of the rewrite.
pub struct JsonStore {
    path: PathBuf,
    kv: RwLock<BTreeMap<String, String>>,
}

impl JsonStore {
    /// Load the mapping from `path`. A missing file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let kv: BTreeMap<String, String> = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Loaded {} variables from {}", kv.len(), path.display());

        Ok(Self {
            path,
            kv: RwLock::new(kv),
        })
    }

    async fn persist(&self, kv: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(kv)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let kv = self.kv.read().await;
        Ok(kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
        self.persist(&kv).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.remove(key);
        self.persist(&kv).await
    }
}
