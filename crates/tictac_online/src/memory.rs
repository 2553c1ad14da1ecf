//! In-process document store.

use crate::error::{StoreError, StoreErrorKind};
use crate::store::{DocumentStore, Subscription, WriteMode};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<String, watch::Sender<Option<Value>>>,
    offline: bool,
}

/// Document store held in memory and shared by cloning.
///
/// Each key owns a watch channel; subscribers see the latest document.
/// Taking the store offline makes every call fail with
/// [`StoreErrorKind::Unavailable`] until it comes back.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory document store");
        Self::default()
    }

    /// Simulates losing or regaining the backend.
    #[instrument(skip(self))]
    pub fn set_offline(&self, offline: bool) {
        match self.inner.lock() {
            Ok(mut inner) => inner.offline = offline,
            Err(poisoned) => poisoned.into_inner().offline = offline,
        }
        info!(offline, "Store availability changed");
    }

    /// Number of live subscriptions on `key`.
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .documents
                    .get(key)
                    .map_or(0, |sender| sender.receiver_count())
            })
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("store lock poisoned"))?;
        if inner.offline {
            warn!("Store call while offline");
            return Err(StoreError::unavailable("store is offline"));
        }
        Ok(inner)
    }

    fn write_now(&self, key: &str, value: Value, mode: WriteMode) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let sender = inner
            .documents
            .entry(key.to_string())
            .or_insert_with(|| watch::channel(None).0);

        let next = match mode {
            WriteMode::Replace => value,
            WriteMode::Merge => {
                let current = sender.borrow().clone();
                merge(current, value)?
            }
        };
        sender.send_replace(Some(next));
        debug!(key, ?mode, "Document written");
        Ok(())
    }

    fn read_now(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .get(key)
            .and_then(|sender| sender.borrow().clone()))
    }

    fn subscribe_now(&self, key: &str) -> Result<Subscription, StoreError> {
        let mut inner = self.lock()?;
        let sender = inner
            .documents
            .entry(key.to_string())
            .or_insert_with(|| watch::channel(None).0);
        let feed = sender.subscribe();
        debug!(key, subscribers = sender.receiver_count(), "Subscribed");
        Ok(Subscription::new(key, feed))
    }
}

/// Shallow merge: payload fields replace stored top-level fields.
fn merge(current: Option<Value>, patch: Value) -> Result<Value, StoreError> {
    let Value::Object(patch) = patch else {
        return Err(StoreError::new(
            StoreErrorKind::InvalidWrite,
            "merge payload must be an object",
        ));
    };
    let mut merged = match current {
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(StoreError::new(
                StoreErrorKind::InvalidWrite,
                "cannot merge into a non-object document",
            ));
        }
        None => serde_json::Map::new(),
    };
    merged.extend(patch);
    Ok(Value::Object(merged))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn write(&self, key: &str, value: Value, mode: WriteMode) -> Result<(), StoreError> {
        self.write_now(key, value, mode)
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read_now(key)
    }

    async fn subscribe(&self, key: &str) -> Result<Subscription, StoreError> {
        self.subscribe_now(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_merge_keeps_other_fields() {
        let store = MemoryStore::new();
        store
            .write("k", json!({ "a": 1, "b": 2 }), WriteMode::Replace)
            .await
            .unwrap();
        store
            .write("k", json!({ "b": 3, "c": 4 }), WriteMode::Merge)
            .await
            .unwrap();
        assert_eq!(
            store.read("k").await.unwrap(),
            Some(json!({ "a": 1, "b": 3, "c": 4 }))
        );
    }

    #[tokio::test]
    async fn test_replace_drops_other_fields() {
        let store = MemoryStore::new();
        store
            .write("k", json!({ "a": 1 }), WriteMode::Replace)
            .await
            .unwrap();
        store
            .write("k", json!({ "b": 2 }), WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(store.read("k").await.unwrap(), Some(json!({ "b": 2 })));
    }

    #[tokio::test]
    async fn test_merge_creates_missing_document() {
        let store = MemoryStore::new();
        store
            .write("k", json!({ "a": 1 }), WriteMode::Merge)
            .await
            .unwrap();
        assert_eq!(store.read("k").await.unwrap(), Some(json!({ "a": 1 })));
    }

    #[tokio::test]
    async fn test_merge_rejects_non_object() {
        let store = MemoryStore::new();
        let err = store
            .write("k", json!([1, 2]), WriteMode::Merge)
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidWrite);
    }

    #[tokio::test]
    async fn test_subscription_sees_current_then_changes() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe("k").await.unwrap();
        assert_eq!(sub.next().await, Some(None));

        store
            .write("k", json!({ "a": 1 }), WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(sub.next().await, Some(Some(json!({ "a": 1 }))));
    }

    #[tokio::test]
    async fn test_dropping_subscription_releases_it() {
        let store = MemoryStore::new();
        let first = store.subscribe("k").await.unwrap();
        let second = store.subscribe("k").await.unwrap();
        assert_eq!(store.subscriber_count("k"), 2);

        drop(first);
        assert_eq!(store.subscriber_count("k"), 1);
        second.unsubscribe();
        assert_eq!(store.subscriber_count("k"), 0);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(store.read("k").await.is_err());
        assert!(store.subscribe("k").await.is_err());
        let err = store
            .write("k", json!({}), WriteMode::Replace)
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Unavailable);

        store.set_offline(false);
        assert!(store.read("k").await.is_ok());
    }
}
