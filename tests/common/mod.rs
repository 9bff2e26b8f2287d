//! Shared test helpers: an in-process document store.

use async_trait::async_trait;
use league_leaderboard::{DocumentStore, PlayerRecord, StoreError};
use std::sync::Mutex;

/// In-process store. Records every overwrite; can be told to fail writes.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    records: Vec<PlayerRecord>,
    writes: Vec<Vec<PlayerRecord>>,
    fail_writes_with: Option<u16>,
}

impl MemoryStore {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                records,
                ..MemoryInner::default()
            }),
        }
    }

    /// Make subsequent overwrites fail with this HTTP status (None to succeed again).
    pub fn fail_writes_with(&self, status: Option<u16>) {
        if let Ok(mut g) = self.inner.lock() {
            g.fail_writes_with = status;
        }
    }

    /// Bodies of every overwrite attempt, in order (failed attempts included).
    pub fn writes(&self) -> Vec<Vec<PlayerRecord>> {
        self.inner
            .lock()
            .map(|g| g.writes.clone())
            .unwrap_or_default()
    }

    pub fn records(&self) -> Vec<PlayerRecord> {
        self.inner
            .lock()
            .map(|g| g.records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_latest(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.records())
    }

    async fn overwrite(&self, records: &[PlayerRecord]) -> Result<(), StoreError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|_| StoreError::Decode("lock error".into()))?;
        g.writes.push(records.to_vec());
        if let Some(status) = g.fail_writes_with {
            return Err(StoreError::Status(status));
        }
        g.records = records.to_vec();
        Ok(())
    }
}

