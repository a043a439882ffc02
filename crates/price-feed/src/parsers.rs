//! Per-exchange ticker response parsers
//!
//! Each exchange reports its spot tickers in its own JSON shape. A parser
//! turns one raw response body into `(pair, price)` tuples; the registry
//! picks the parser by exchange identifier. Supporting a new exchange means
//! registering another `QuoteParser`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use scraper_core::{FeedError, FeedResult, RawQuote, BINANCE_COM, GATE_IO, OKX_COM};

/// Parses one exchange's ticker response
pub trait QuoteParser: Send + Sync {
    /// Exchange identifier this parser is registered under
    fn exchange(&self) -> &str;

    fn parse(&self, body: &[u8]) -> FeedResult<Vec<RawQuote>>;
}

fn decode<T: DeserializeOwned>(exchange: &str, body: &[u8]) -> FeedResult<T> {
    serde_json::from_slice(body).map_err(|e| FeedError::Schema {
        exchange: exchange.to_string(),
        reason: e.to_string(),
    })
}

/// String field that decodes to `""` when null or not a string.
///
/// Keeps one malformed ticker from failing the whole response; the empty
/// value is then rejected on its own when the price is parsed.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// List entry that falls back to its default when it is not an object
#[derive(Debug)]
struct Entry<T>(T);

impl<'de, T> Deserialize<'de> for Entry<T>
where
    T: DeserializeOwned + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Entry(T::deserialize(value).unwrap_or_default()))
    }
}

/// Flat array of `{"symbol", "price"}` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct BinanceParser;

#[derive(Debug, Default, Deserialize)]
struct BinanceTicker {
    #[serde(default, deserialize_with = "lenient_string")]
    symbol: String,
    #[serde(default, deserialize_with = "lenient_string")]
    price: String,
}

impl QuoteParser for BinanceParser {
    fn exchange(&self) -> &str {
        BINANCE_COM
    }

    fn parse(&self, body: &[u8]) -> FeedResult<Vec<RawQuote>> {
        let tickers: Vec<Entry<BinanceTicker>> = decode(self.exchange(), body)?;
        Ok(tickers
            .into_iter()
            .map(|Entry(t)| RawQuote::new(t.symbol, t.price))
            .collect())
    }
}

/// Flat array of `{"currency_pair", "last"}` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct GateParser;

#[derive(Debug, Default, Deserialize)]
struct GateTicker {
    #[serde(default, deserialize_with = "lenient_string")]
    currency_pair: String,
    #[serde(default, deserialize_with = "lenient_string")]
    last: String,
}

impl QuoteParser for GateParser {
    fn exchange(&self) -> &str {
        GATE_IO
    }

    fn parse(&self, body: &[u8]) -> FeedResult<Vec<RawQuote>> {
        let tickers: Vec<Entry<GateTicker>> = decode(self.exchange(), body)?;
        Ok(tickers
            .into_iter()
            .map(|Entry(t)| RawQuote::new(t.currency_pair, t.last))
            .collect())
    }
}

/// Object with a `data` array of `{"instId", "last"}` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct OkxParser;

#[derive(Debug, Deserialize)]
struct OkxResponse {
    #[serde(default)]
    data: Vec<Entry<OkxTicker>>,
}

#[derive(Debug, Default, Deserialize)]
struct OkxTicker {
    #[serde(rename = "instId", default, deserialize_with = "lenient_string")]
    inst_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    last: String,
}

impl QuoteParser for OkxParser {
    fn exchange(&self) -> &str {
        OKX_COM
    }

    fn parse(&self, body: &[u8]) -> FeedResult<Vec<RawQuote>> {
        let response: OkxResponse = decode(self.exchange(), body)?;
        Ok(response
            .data
            .into_iter()
            .map(|Entry(t)| RawQuote::new(t.inst_id, t.last))
            .collect())
    }
}

/// Exchange identifier → parser
pub struct NormalizerRegistry {
    parsers: HashMap<String, Box<dyn QuoteParser>>,
}

impl NormalizerRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Parsers for every exchange scraped by default
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BinanceParser);
        registry.register(GateParser);
        registry.register(OkxParser);
        registry
    }

    /// Register a parser, replacing any previous one for the same exchange
    pub fn register<P: QuoteParser + 'static>(&mut self, parser: P) {
        self.parsers
            .insert(parser.exchange().to_string(), Box::new(parser));
    }

    pub fn supports(&self, exchange: &str) -> bool {
        self.parsers.contains_key(exchange)
    }

    pub fn parse(&self, exchange: &str, body: &[u8]) -> FeedResult<Vec<RawQuote>> {
        let parser = self
            .parsers
            .get(exchange)
            .ok_or_else(|| FeedError::UnknownExchange(exchange.to_string()))?;
        parser.parse(body)
    }

    /// Like `parse`, but any failure is logged and yields no quotes
    pub fn normalize(&self, exchange: &str, body: &[u8]) -> Vec<RawQuote> {
        match self.parse(exchange, body) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(exchange, error = %e, "Discarding exchange response");
                Vec::new()
            }
        }
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
