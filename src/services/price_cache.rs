use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::models::PriceQuote;
use crate::services::price_source::{PriceError, PriceSource};

/// Memoizes successful quotes for a short TTL so repeated lookups of the same
/// symbol within one pass hit the provider once. The TTL is kept under the
/// poll interval by `config`. Failures are never cached.
pub struct CachedPriceSource {
    inner: Arc<dyn PriceSource>,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PriceQuote)>>,
}

impl CachedPriceSource {
    pub fn new(inner: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, symbol: &str) -> Option<PriceQuote> {
        let entries = self.entries.lock().ok()?;
        let (stored_at, quote) = entries.get(symbol)?;
        if stored_at.elapsed() < self.ttl {
            Some(quote.clone())
        } else {
            None
        }
    }

    fn store(&self, quote: &PriceQuote) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|_, (at, _)| at.elapsed() < self.ttl);
            entries.insert(quote.symbol.clone(), (Instant::now(), quote.clone()));
        }
    }
}

#[async_trait]
impl PriceSource for CachedPriceSource {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        if let Some(q) = self.cached(symbol) {
            tracing::debug!(symbol, "quote cache hit");
            return Ok(q);
        }

        let quote = self.inner.latest_price(symbol).await?;
        self.store(&quote);
        Ok(quote)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
