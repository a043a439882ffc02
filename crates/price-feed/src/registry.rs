//! Registered exchanges

use std::collections::BTreeMap;

use scraper_core::ExchangeSpec;

/// Exchange identifier → ticker endpoint.
///
/// Iteration is ordered by identifier so polling and lookups visit exchanges
/// in the same, stable order. Read-only after construction.
#[derive(Debug, Clone)]
pub struct ExchangeRegistry {
    exchanges: BTreeMap<String, ExchangeSpec>,
}

impl ExchangeRegistry {
    /// Later specs with a repeated identifier replace earlier ones
    pub fn new(specs: impl IntoIterator<Item = ExchangeSpec>) -> Self {
        let exchanges = specs
            .into_iter()
            .map(|spec| (spec.id.clone(), spec))
            .collect();
        Self { exchanges }
    }

    /// Endpoint of a registered exchange
    pub fn endpoint(&self, id: &str) -> Option<&str> {
        self.exchanges.get(id).map(|s| s.endpoint_url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeSpec> {
        self.exchanges.values()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.exchanges.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for ExchangeRegistry {
    fn default() -> Self {
        Self::new(ExchangeSpec::defaults())
    }
}
