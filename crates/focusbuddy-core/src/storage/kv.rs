//! Async key-value store abstraction.
//!
//! Records are whole JSON values under flat string keys. Callers do
//! read-modify-write of entire records; nothing here is transactional,
//! so two writers on the same key race and the last write wins.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::Result;

/// Persistent store shared by the foreground and background contexts.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the raw value under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Drop `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Read a typed record. Absent and malformed values both yield `None`;
/// a malformed value is logged and left for the next write to replace.
pub async fn load<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored record, falling back to default");
            Ok(None)
        }
    }
}

/// Read a typed record, substituting `T::default()` when absent or malformed.
pub async fn load_or_default<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KvStore + ?Sized,
{
    Ok(load(store, key).await?.unwrap_or_default())
}

/// Serialize and write a typed record.
pub async fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    store.set(key, serde_json::to_value(value)?).await
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
