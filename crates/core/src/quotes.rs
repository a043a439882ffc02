//! Raw and canonical quote types

use serde::{Deserialize, Serialize};

use crate::QuoteError;

/// Characters exchanges use to split base and quote asset in a pair name
pub const PAIR_SEPARATORS: [char; 2] = ['-', '_'];

/// Strip exchange-specific separators from a pair name.
///
/// `BTC_USDT`, `BTC-USDT` and `BTCUSDT` all become `BTCUSDT`. Case is kept
/// exactly as the exchange reported it.
pub fn canonicalize(raw_pair: &str) -> String {
    raw_pair
        .chars()
        .filter(|c| !PAIR_SEPARATORS.contains(c))
        .collect()
}

/// Parse an exchange price string into a finite `f64`.
pub fn parse_price(raw: &str) -> Result<f64, QuoteError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(QuoteError::InvalidPrice(raw.to_string())),
    }
}

/// A `(pair, price)` tuple as reported by an exchange, before canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuote {
    pub pair: String,
    pub price: String,
}

impl RawQuote {
    pub fn new(pair: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            price: price.into(),
        }
    }

    /// Canonical symbol for this quote's pair
    pub fn symbol(&self) -> String {
        canonicalize(&self.pair)
    }
}

/// A normalized spot price observed on one exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalQuote {
    pub exchange: String,
    pub symbol: String,
    pub price: f64,
}

impl CanonicalQuote {
    /// Build a canonical quote, failing if the price is not a finite number
    pub fn from_raw(exchange: &str, raw: &RawQuote) -> Result<Self, QuoteError> {
        Ok(Self {
            exchange: exchange.to_string(),
            symbol: raw.symbol(),
            price: parse_price(&raw.price)?,
        })
    }
}

/// One entry of a price lookup response.
///
/// `price` is the string the exchange sent, not a re-formatted float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairPrice {
    pub exchange: String,
    pub pair: String,
    pub price: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonicalize_strips_separators() {
        assert_eq!(canonicalize("BTC_USDT"), "BTCUSDT");
        assert_eq!(canonicalize("OKB-USDT"), "OKBUSDT");
        assert_eq!(canonicalize("ETHUSDT"), "ETHUSDT");
        assert_eq!(canonicalize("a-b_c--d"), "abcd");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_canonicalize_preserves_case() {
        assert_eq!(canonicalize("btc_usdt"), "btcusdt");
        assert_ne!(canonicalize("btc_usdt"), canonicalize("BTC_USDT"));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("65000.12").unwrap(), 65000.12);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert_eq!(parse_price("1e-8").unwrap(), 1e-8);

        for bad in ["", "abc", "12,5", "NaN", "inf", "-infinity", " 1.0"] {
            assert!(parse_price(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_canonical_quote_from_raw() {
        let raw = RawQuote::new("BTC_USDT", "65000.12");
        let quote = CanonicalQuote::from_raw("gate.io", &raw).unwrap();

        assert_eq!(
            quote,
            CanonicalQuote {
                exchange: "gate.io".to_string(),
                symbol: "BTCUSDT".to_string(),
                price: 65000.12,
            }
        );

        let bad = RawQuote::new("BTC_USDT", "n/a");
        assert!(matches!(
            CanonicalQuote::from_raw("gate.io", &bad),
            Err(QuoteError::InvalidPrice(p)) if p == "n/a"
        ));
    }

    proptest! {
        #[test]
        fn prop_canonicalize_idempotent(pair in "[A-Za-z0-9_-]{0,24}") {
            let once = canonicalize(&pair);
            prop_assert!(!once.contains('-') && !once.contains('_'));
            prop_assert_eq!(canonicalize(&once), once.clone());
        }

        #[test]
        fn prop_parse_price_matches_value(value in -1.0e12f64..1.0e12f64) {
            let text = value.to_string();
            prop_assert_eq!(parse_price(&text).unwrap(), value);
        }

        #[test]
        fn prop_parse_price_rejects_letters(text in "[a-zA-Z]{1,8}") {
            // The only alphabetic inputs f64 accepts are non-finite
            prop_assert!(parse_price(&text).is_err());
        }
    }
}
