#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use http_body_util::BodyExt;
use stockwatch::{
    config::{PriceSourceKind, Settings},
    models::PriceQuote,
    services::{
        notifier::{NotifyError, Notifier},
        price_cache::CachedPriceSource,
        price_source::{PriceError, PriceSource},
    },
    AppState,
};

/// Price source whose answers the test sets directly. Symbols without a
/// price fail with DataUnavailable.
#[derive(Default)]
pub struct FakePrices {
    prices: Mutex<HashMap<String, f64>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakePrices {
    pub fn set(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    pub fn fail(&self, symbol: &str) {
        self.prices.lock().unwrap().remove(symbol);
    }
}

#[async_trait]
impl PriceSource for FakePrices {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let price = self.prices.lock().unwrap().get(symbol).copied();
        match price {
            Some(p) => Ok(PriceQuote::new(symbol, p, Utc::now())),
            None => Err(PriceError::unavailable(symbol, "no data")),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(Sent {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            return Err(NotifyError::SendFailed("smtp down".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct Harness {
    pub state: AppState,
    pub prices: Arc<FakePrices>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness() -> Harness {
    harness_with(RecordingNotifier::default())
}

/// Fixed settings, independent of `.env` and the process environment.
pub fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        price_source: PriceSourceKind::Yahoo,
        alpha_vantage_api_key: String::new(),
        poll_interval: Duration::from_secs(15),
        quote_cache_ttl: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        monitor_autostart: true,
        desktop_notifications: false,
        smtp: None,
    }
}

pub fn harness_with(notifier: RecordingNotifier) -> Harness {
    let prices = Arc::new(FakePrices::default());
    let notifier = Arc::new(notifier);
    let state = AppState::new(test_settings(), prices.clone(), notifier.clone());

    Harness {
        state,
        prices,
        notifier,
    }
}

/// Like `harness`, but the fake source sits behind the quote cache the way
/// the production source does, using `settings`' TTL.
pub fn cached_harness(settings: Settings) -> Harness {
    let prices = Arc::new(FakePrices::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let cached = Arc::new(CachedPriceSource::new(prices.clone(), settings.quote_cache_ttl));
    let state = AppState::new(settings, cached, notifier.clone());

    Harness {
        state,
        prices,
        notifier,
    }
}

pub async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}
