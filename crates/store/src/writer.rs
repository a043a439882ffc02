//! Atomic per-exchange batch writes

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use scraper_core::{CanonicalQuote, StoreError, StoreResult};

use crate::traits::QuoteStore;

/// Writes one exchange's quotes for one tick as a single transaction
#[derive(Clone)]
pub struct BatchWriter {
    store: Arc<dyn QuoteStore>,
    budget: Duration,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn QuoteStore>, budget: Duration) -> Self {
        Self { store, budget }
    }

    /// Persist every quote or none of them.
    ///
    /// Failures are logged here; the caller only counts them.
    pub async fn write(&self, exchange: &str, quotes: &[CanonicalQuote]) -> StoreResult<usize> {
        if let Some(stray) = quotes.iter().find(|q| q.exchange != exchange) {
            let err = StoreError::InvalidBatch(format!(
                "quote from {} in {} batch",
                stray.exchange, exchange
            ));
            error!(exchange, error = %err, "Rejected batch");
            return Err(err);
        }

        if quotes.is_empty() {
            debug!(exchange, "Nothing to write");
            return Ok(0);
        }

        let result = match tokio::time::timeout(
            self.budget,
            self.store.insert_batch(exchange, quotes),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.budget)),
        };

        match &result {
            Ok(rows) => debug!(exchange, rows, store = self.store.name(), "Batch written"),
            Err(e) => error!(
                exchange,
                rows = quotes.len(),
                store = self.store.name(),
                error = %e,
                "Batch write failed, discarding batch"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn batch(exchange: &str, n: usize) -> Vec<CanonicalQuote> {
        (0..n)
            .map(|i| CanonicalQuote {
                exchange: exchange.to_string(),
                symbol: format!("SYM{i}USDT"),
                price: i as f64 + 0.5,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_write_persists_batch() {
        let store = Arc::new(MemoryStore::new());
        let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));

        let written = writer.write("okx.com", &batch("okx.com", 3)).await.unwrap();
        assert_eq!(written, 3);
        assert_eq!(store.rows_for("okx.com").len(), 3);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_no_rows_and_spares_others() {
        let store = Arc::new(MemoryStore::new());
        let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));

        writer.write("binance.com", &batch("binance.com", 2)).await.unwrap();

        store.fail_next_batch_at(9);
        let result = writer.write("gate.io", &batch("gate.io", 10)).await;
        assert!(result.is_err());
        assert!(store.rows_for("gate.io").is_empty());

        writer.write("okx.com", &batch("okx.com", 4)).await.unwrap();
        assert_eq!(store.rows_for("binance.com").len(), 2);
        assert_eq!(store.rows_for("okx.com").len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exceeded_discards_batch() {
        let store = Arc::new(MemoryStore::new());
        store.set_commit_delay(Duration::from_secs(60));
        let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));

        let result = writer.write("gate.io", &batch("gate.io", 3)).await;
        assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_secs(15)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_exchange_batch_rejected() {
        let store = Arc::new(MemoryStore::new());
        let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));

        let mut quotes = batch("gate.io", 2);
        quotes.extend(batch("okx.com", 1));

        assert!(matches!(
            writer.write("gate.io", &quotes).await,
            Err(StoreError::InvalidBatch(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));

        assert_eq!(writer.write("gate.io", &[]).await.unwrap(), 0);
    }
}
