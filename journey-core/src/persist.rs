//! Saving the closing memory.
//!
//! The journey writes one record: the answers, a quote, and when it was
//! saved. Stores are plain key-value sinks.

use crate::questions::AnswerRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nothing stored under key {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The saved memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// When the memory was saved.
    pub date: DateTime<Utc>,
    pub answers: AnswerRecord,
    pub quote: String,
}

impl MemoryRecord {
    /// Stamp a record with the current time.
    pub fn new(answers: AnswerRecord, quote: impl Into<String>) -> Self {
        Self {
            date: Utc::now(),
            answers,
            quote: quote.into(),
        }
    }
}

/// A local key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set(&self, key: &str, value: String) -> Result<(), PersistError>;
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File that backs `key`. Non-alphanumeric characters become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn set(&self, key: &str, value: String) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps values in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: String) -> Result<(), PersistError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.values.lock().await.get(key).cloned())
    }
}

/// Write `record` under `key`.
pub async fn save_memory(
    store: &dyn KeyValueStore,
    key: &str,
    record: &MemoryRecord,
) -> Result<(), PersistError> {
    let content = serde_json::to_string(record)?;
    store.set(key, content).await
}

/// Read back a record written by [`save_memory`].
pub async fn load_memory(store: &dyn KeyValueStore, key: &str) -> Result<MemoryRecord, PersistError> {
    let content = store
        .get(key)
        .await?
        .ok_or_else(|| PersistError::NotFound(key.to_string()))?;
    Ok(serde_json::from_str(&content)?)
}
