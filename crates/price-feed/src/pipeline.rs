//! Fetch → parse → canonicalize, shared by polling and lookups

use std::sync::Arc;
use tracing::{debug, warn};

use scraper_core::{CanonicalQuote, ExchangeSpec, RawQuote};

use crate::fetcher::Fetcher;
use crate::parsers::NormalizerRegistry;
use crate::registry::ExchangeRegistry;

/// Everything needed to turn a registered exchange into quotes
#[derive(Clone)]
pub struct QuotePipeline {
    registry: Arc<ExchangeRegistry>,
    fetcher: Arc<dyn Fetcher>,
    normalizers: Arc<NormalizerRegistry>,
}

impl QuotePipeline {
    pub fn new(
        registry: Arc<ExchangeRegistry>,
        fetcher: Arc<dyn Fetcher>,
        normalizers: Arc<NormalizerRegistry>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            normalizers,
        }
    }

    pub fn registry(&self) -> &ExchangeRegistry {
        &self.registry
    }

    /// Live `(pair, price)` tuples for one exchange; empty on any failure
    pub async fn raw_quotes(&self, exchange: &ExchangeSpec) -> Vec<RawQuote> {
        let body = self.fetcher.fetch(&exchange.id, &exchange.endpoint_url).await;
        let quotes = self.normalizers.normalize(&exchange.id, &body);
        debug!(exchange = %exchange.id, bytes = body.len(), quotes = quotes.len(), "Fetched tickers");
        quotes
    }
}

/// Canonicalize one exchange's raw quotes.
///
/// Quotes whose price is not a finite number are logged and skipped; the
/// second value is how many were skipped.
pub fn canonical_batch(exchange: &str, raw: &[RawQuote]) -> (Vec<CanonicalQuote>, usize) {
    let mut batch = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for quote in raw {
        match CanonicalQuote::from_raw(exchange, quote) {
            Ok(canonical) => batch.push(canonical),
            Err(e) => {
                dropped += 1;
                warn!(exchange, pair = %quote.pair, error = %e, "Skipping quote");
            }
        }
    }

    (batch, dropped)
}
