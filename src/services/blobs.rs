//! Bounded in-memory blob store for generated media.
//!
//! Finished videos are downloaded once and served back to the browser from
//! here as `/api/blobs/{id}`. Insertion past capacity evicts the oldest blob.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

pub const DEFAULT_BLOB_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Slots {
    order: VecDeque<Uuid>,
    blobs: HashMap<Uuid, Arc<Blob>>,
}

pub struct BlobStore {
    slots: RwLock<Slots>,
    capacity: usize,
}

impl BlobStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { slots: RwLock::new(Slots::default()), capacity: capacity.max(1) }
    }

    /// Store `bytes` and return the handle.
    pub async fn insert(&self, mime_type: &str, bytes: Vec<u8>) -> Uuid {
        let id = Uuid::new_v4();
        let mut slots = self.slots.write().await;
        while slots.order.len() >= self.capacity {
            if let Some(oldest) = slots.order.pop_front() {
                slots.blobs.remove(&oldest);
                tracing::debug!(%oldest, "evicted blob");
            }
        }
        slots.order.push_back(id);
        slots.blobs.insert(id, Arc::new(Blob { mime_type: mime_type.to_owned(), bytes }));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Blob>> {
        self.slots.read().await.blobs.get(&id).cloned()
    }

    /// Revoke a handle. Returns `false` if it was already gone.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut slots = self.slots.write().await;
        let removed = slots.blobs.remove(&id).is_some();
        if removed {
            slots.order.retain(|b| *b != id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.blobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new(DEFAULT_BLOB_CAPACITY)
    }
}

/// Public URL for a stored blob.
#[must_use]
pub fn blob_url(id: Uuid) -> String {
    format!("/api/blobs/{id}")
}

#[cfg(test)]
#[path = "blobs_test.rs"]
mod tests;
