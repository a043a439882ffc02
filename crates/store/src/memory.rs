//! In-process quote store
//!
//! Same batch semantics as the database backend: rows of a batch become
//! visible together at commit, or not at all.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

use scraper_core::{CanonicalQuote, StoreError, StoreResult};

use crate::traits::{QuoteStore, StoredRow};

#[derive(Debug)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRow>>,
    fail_on_statement: Mutex<Option<usize>>,
    commit_delay: Mutex<Option<Duration>>,
    healthy: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_on_statement: Mutex::new(None),
            commit_delay: Mutex::new(None),
            healthy: AtomicBool::new(true),
        }
    }

    /// Make statement `index` (zero based) of the next batch that reaches it fail
    pub fn fail_next_batch_at(&self, index: usize) {
        *self.fail_on_statement.lock() = Some(index);
    }

    /// Wait this long before committing each batch
    pub fn set_commit_delay(&self, delay: Duration) {
        *self.commit_delay.lock() = Some(delay);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Snapshot of committed rows, in commit order
    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows.lock().clone()
    }

    pub fn rows_for(&self, exchange: &str) -> Vec<StoredRow> {
        self.rows
            .lock()
            .iter()
            .filter(|r| r.exchange == exchange)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::HealthCheck("store marked unhealthy".into()))
        }
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_batch(&self, exchange: &str, quotes: &[CanonicalQuote]) -> StoreResult<usize> {
        let mut staged = Vec::with_capacity(quotes.len());

        for (index, quote) in quotes.iter().enumerate() {
            {
                let mut fail_on = self.fail_on_statement.lock();
                if *fail_on == Some(index) {
                    *fail_on = None;
                    return Err(StoreError::Injected(index));
                }
            }
            staged.push(StoredRow::from(quote));
        }

        let delay = *self.commit_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let written = staged.len();
        self.rows.lock().extend(staged);
        debug!(exchange, rows = written, "Batch committed");
        Ok(written)
    }
}
