//! The synchronized document store seam.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// How a write combines with the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The payload becomes the whole document.
    Replace,
    /// Top-level payload fields overwrite stored ones; others are kept.
    Merge,
}

/// A keyed JSON document store with change notification.
///
/// Implementations serialize writes per key. There is no conditional write:
/// concurrent writers race and the last one wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `value` under `key`.
    async fn write(&self, key: &str, value: Value, mode: WriteMode) -> Result<(), StoreError>;

    /// Reads the current document, `None` if it does not exist.
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Subscribes to `key`. The subscription yields the current document
    /// first, then each later change.
    async fn subscribe(&self, key: &str) -> Result<Subscription, StoreError>;
}

/// Owned handle on a key's change feed.
///
/// Dropping the handle releases it. Rapid changes may coalesce: each
/// [`next`](Subscription::next) returns the latest document, not every
/// intermediate one.
#[derive(Debug)]
pub struct Subscription {
    key: String,
    feed: watch::Receiver<Option<Value>>,
    primed: bool,
}

impl Subscription {
    /// Wraps a watch receiver as a subscription on `key`.
    pub fn new(key: impl Into<String>, feed: watch::Receiver<Option<Value>>) -> Self {
        Self {
            key: key.into(),
            feed,
            primed: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// The outer `None` means the store closed the feed; the inner one means
    /// the document does not exist.
    #[instrument(level = "trace", skip(self), fields(key = %self.key))]
    pub async fn next(&mut self) -> Option<Option<Value>> {
        if self.primed {
            self.feed.changed().await.ok()?;
        }
        self.primed = true;
        Some(self.feed.borrow_and_update().clone())
    }

    /// Explicitly releases the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(key = %self.key, "Subscription released");
    }
}
