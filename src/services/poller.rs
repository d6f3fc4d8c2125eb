use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{PriceMap, PriceQuote};
use crate::services::price_source::{PriceError, PriceSource};

/// Fetches the latest price for each symbol of interest, one symbol at a time.
#[derive(Clone)]
pub struct Poller {
    source: Arc<dyn PriceSource>,
    timeout: Duration,
}

impl Poller {
    pub fn new(source: Arc<dyn PriceSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn fetch_latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        match tokio::time::timeout(self.timeout, self.source.latest_price(symbol)).await {
            Ok(res) => res,
            Err(_) => Err(PriceError::Timeout(symbol.to_string())),
        }
    }

    /// Returns quotes for the symbols that answered. A failed symbol is
    /// logged and left out of the map.
    pub async fn fetch_latest_prices(&self, symbols: &[String]) -> PriceMap {
        let unique: BTreeSet<&str> = symbols.iter().map(String::as_str).collect();
        let mut prices = PriceMap::new();

        for sym in unique {
            match self.fetch_latest_price(sym).await {
                Ok(q) => {
                    prices.insert(sym.to_string(), q);
                }
                Err(e) => {
                    tracing::warn!(symbol = sym, source = self.source.name(), "skipping symbol this cycle: {e}");
                }
            }
        }

        prices
    }
}
