use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{PriceSourceKind, Settings};
use crate::models::PriceQuote;
use crate::services::{alpha_vantage::AlphaVantageClient, price_cache::CachedPriceSource, yahoo::YahooClient};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("no price data available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("price request for {0} timed out")]
    Timeout(String),
}

impl PriceError {
    pub fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        PriceError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// Something that can answer "what is the latest price for this symbol".
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError>;

    fn name(&self) -> &'static str;
}

/// Rejects quotes that cannot be compared against a target.
pub fn ensure_usable(quote: PriceQuote) -> Result<PriceQuote, PriceError> {
    if !quote.price.is_finite() || quote.price <= 0.0 {
        return Err(PriceError::unavailable(
            &quote.symbol,
            format!("unusable price {}", quote.price),
        ));
    }
    Ok(quote)
}

/// Builds the configured provider, wrapped in the short-TTL cache when enabled.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn PriceSource>, String> {
    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .user_agent(concat!("stockwatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| e.to_string())?;

    let source: Arc<dyn PriceSource> = match settings.price_source {
        PriceSourceKind::Yahoo => Arc::new(YahooClient::with_http(http)),
        PriceSourceKind::AlphaVantage => Arc::new(AlphaVantageClient::with_http(
            http,
            settings.alpha_vantage_api_key.clone(),
        )),
    };

    if settings.quote_cache_ttl.is_zero() {
        return Ok(source);
    }

    Ok(Arc::new(CachedPriceSource::new(source, settings.quote_cache_ttl)))
}
