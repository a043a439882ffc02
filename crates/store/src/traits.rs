//! Storage traits.

use async_trait::async_trait;

use scraper_core::{CanonicalQuote, StoreResult};

/// One row of the append-only quote table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub exchange: String,
    pub pair: String,
    pub price: f64,
}

impl From<&CanonicalQuote> for StoredRow {
    fn from(quote: &CanonicalQuote) -> Self {
        Self {
            exchange: quote.exchange.clone(),
            pair: quote.symbol.clone(),
            price: quote.price,
        }
    }
}

/// Backend holding persisted quotes.
///
/// Rows are only ever appended. A batch is committed as a whole or not at
/// all, and dropping an `insert_batch` future before it resolves must leave
/// nothing behind.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Liveness probe
    async fn ping(&self) -> StoreResult<()>;

    /// Create the quote table if it does not exist
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// Insert every quote of one exchange in a single transaction
    async fn insert_batch(&self, exchange: &str, quotes: &[CanonicalQuote]) -> StoreResult<usize>;
}
