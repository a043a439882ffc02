//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the Binance spot ticker source
pub const BINANCE_COM: &str = "binance.com";
/// Identifier of the Gate.io spot ticker source
pub const GATE_IO: &str = "gate.io";
/// Identifier of the OKX spot ticker source
pub const OKX_COM: &str = "okx.com";

/// A registered exchange and the endpoint its tickers are fetched from.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeSpec {
    pub id: String,
    pub endpoint_url: String,
}

impl ExchangeSpec {
    pub fn new(id: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint_url: endpoint_url.into(),
        }
    }

    /// The exchanges scraped by default
    pub fn defaults() -> Vec<ExchangeSpec> {
        vec![
            ExchangeSpec::new(BINANCE_COM, "https://api.binance.com/api/v3/ticker/price"),
            ExchangeSpec::new(GATE_IO, "https://api.gateio.ws/api/v4/spot/tickers"),
            ExchangeSpec::new(
                OKX_COM,
                "https://www.okx.com/api/v5/market/tickers?instType=SPOT",
            ),
        ]
    }
}

impl fmt::Display for ExchangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.endpoint_url)
    }
}
