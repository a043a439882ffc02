//! Live cross-exchange price lookup

use tracing::debug;

use scraper_core::PairPrice;

use crate::pipeline::QuotePipeline;

/// Answers "what does every exchange quote for this symbol right now".
///
/// Every call fetches all exchanges again; the persisted store is not read.
#[derive(Clone)]
pub struct QueryService {
    pipeline: QuotePipeline,
}

impl QueryService {
    pub fn new(pipeline: QuotePipeline) -> Self {
        Self { pipeline }
    }

    /// Quotes whose canonical symbol equals `symbol` exactly (case-sensitive).
    ///
    /// Ordered by exchange identifier, then by the exchange's own order.
    /// No match is an empty list, not an error.
    pub async fn lookup(&self, symbol: &str) -> Vec<PairPrice> {
        let mut matches = Vec::new();

        for exchange in self.pipeline.registry().iter() {
            for raw in self.pipeline.raw_quotes(exchange).await {
                let pair = raw.symbol();
                if pair == symbol {
                    matches.push(PairPrice {
                        exchange: exchange.id.clone(),
                        pair,
                        price: raw.price,
                    });
                }
            }
        }

        debug!(symbol, matches = matches.len(), "Lookup complete");
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;
    use crate::parsers::NormalizerRegistry;
    use crate::registry::ExchangeRegistry;
    use scraper_core::{ExchangeSpec, BINANCE_COM, GATE_IO, OKX_COM};
    use std::sync::Arc;

    fn service(fetcher: Arc<StaticFetcher>) -> QueryService {
        let registry = ExchangeRegistry::new(vec![
            ExchangeSpec::new(BINANCE_COM, "https://binance.test"),
            ExchangeSpec::new(GATE_IO, "https://gate.test"),
            ExchangeSpec::new(OKX_COM, "https://okx.test"),
        ]);
        QueryService::new(QuotePipeline::new(
            Arc::new(registry),
            fetcher,
            Arc::new(NormalizerRegistry::with_defaults()),
        ))
    }

    fn scenario_fetcher() -> Arc<StaticFetcher> {
        Arc::new(
            StaticFetcher::new()
                .with_body("https://binance.test", r#"[{"symbol":"ETHUSDT","price":"3200.50"}]"#)
                .with_body("https://gate.test", r#"[{"currency_pair":"BTC_USDT","last":"65000.12"}]"#)
                .with_body("https://okx.test", r#"{"data":[{"instId":"OKB-USDT","last":"45.2"}]}"#),
        )
    }

    #[tokio::test]
    async fn test_lookup_single_exchange_match() {
        let service = service(scenario_fetcher());

        let result = service.lookup("BTCUSDT").await;

        assert_eq!(
            result,
            vec![PairPrice {
                exchange: GATE_IO.to_string(),
                pair: "BTCUSDT".to_string(),
                price: "65000.12".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_lookup_no_match_is_empty() {
        let service = service(scenario_fetcher());
        assert!(service.lookup("DOGEUSDT").await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive_and_exact() {
        let service = service(scenario_fetcher());

        assert!(service.lookup("btcusdt").await.is_empty());
        assert!(service.lookup("BTC_USDT").await.is_empty());
        assert!(service.lookup("BTC").await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_across_exchanges_keeps_price_text() {
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_body("https://okx.test", r#"{"data":[{"instId":"BTC-USDT","last":"65001.10"}]}"#)
                .with_body("https://binance.test", r#"[{"symbol":"BTCUSDT","price":"65000.00000000"}]"#)
                .with_body("https://gate.test", r#"[{"currency_pair":"BTC_USDT","last":"65000.12"}]"#),
        );
        let result = service(fetcher).lookup("BTCUSDT").await;

        let exchanges: Vec<&str> = result.iter().map(|p| p.exchange.as_str()).collect();
        assert_eq!(exchanges, vec![BINANCE_COM, GATE_IO, OKX_COM]);
        assert_eq!(result[0].price, "65000.00000000");
    }

    #[tokio::test]
    async fn test_lookup_fetches_live_every_call() {
        let fetcher = scenario_fetcher();
        let service = service(Arc::clone(&fetcher));

        service.lookup("BTCUSDT").await;
        fetcher.set_body("https://gate.test", r#"[{"currency_pair":"BTC_USDT","last":"1.5"}]"#);
        let result = service.lookup("BTCUSDT").await;

        assert_eq!(fetcher.calls(), 6);
        assert_eq!(result[0].price, "1.5");
    }

    #[tokio::test]
    async fn test_lookup_all_exchanges_down() {
        let service = service(Arc::new(StaticFetcher::new()));
        assert!(service.lookup("BTCUSDT").await.is_empty());
    }
}
