// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## Purpose
//
// An ephemeral store for tests and one-shot runs where nothing needs to
// survive the process. Entries are lost on exit.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::record_store::{CreatedRecord, RecordStore};

/// In-memory record store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<Vec<CreatedRecord>>>,
}

impl MemoryRecordStore {
    /// Create a new empty memory record store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn append(&self, record: &CreatedRecord) -> Result<(), Error> {
        self.inner.write().await.push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<CreatedRecord>, Error> {
        Ok(self.inner.read().await.clone())
    }
}
