use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::models::PriceQuote;
use crate::services::price_source::{ensure_usable, PriceError, PriceSource};

const QUERY_URL: &str = "https://www.alphavantage.co/query";

#[derive(Clone)]
pub struct AlphaVantageClient {
    http: Client,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn with_http(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn intraday(&self, symbol: &str) -> Result<IntradayResponse, PriceError> {
        if !self.has_key() {
            return Err(PriceError::unavailable(
                symbol,
                "ALPHA_VANTAGE_API_KEY is missing in .env",
            ));
        }

        let res = self
            .http
            .get(QUERY_URL)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol),
                ("interval", "1min"),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| request_error(symbol, e))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PriceError::unavailable(
                symbol,
                format!("Alpha Vantage intraday failed: {status} {body}"),
            ));
        }

        res.json::<IntradayResponse>()
            .await
            .map_err(|e| PriceError::unavailable(symbol, e.to_string()))
    }
}

fn request_error(symbol: &str, e: reqwest::Error) -> PriceError {
    if e.is_timeout() {
        PriceError::Timeout(symbol.to_string())
    } else {
        PriceError::unavailable(symbol, e.to_string())
    }
}

#[async_trait]
impl PriceSource for AlphaVantageClient {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        let resp = self.intraday(symbol).await?;
        latest_close(symbol, &resp)
    }

    fn name(&self) -> &'static str {
        "alpha_vantage"
    }
}

/// Picks the close of the most recent bar. Bar keys are
/// `YYYY-MM-DD HH:MM:SS`, so the lexicographic maximum is the latest one.
pub fn latest_close(symbol: &str, resp: &IntradayResponse) -> Result<PriceQuote, PriceError> {
    if let Some(msg) = resp
        .error_message
        .as_ref()
        .or(resp.note.as_ref())
        .or(resp.information.as_ref())
    {
        return Err(PriceError::unavailable(symbol, msg.clone()));
    }

    let Some((_, bar)) = resp.series.as_ref().and_then(|s| s.iter().next_back()) else {
        return Err(PriceError::unavailable(symbol, "empty time series"));
    };

    let price: f64 = bar
        .close
        .trim()
        .parse()
        .map_err(|_| PriceError::unavailable(symbol, format!("bad close value {:?}", bar.close)))?;

    // Bar timestamps are exchange-local without an offset; use fetch time.
    ensure_usable(PriceQuote::new(symbol, price, Utc::now()))
}

#[derive(Debug, Deserialize)]
pub struct IntradayResponse {
    #[serde(rename = "Time Series (1min)")]
    pub series: Option<BTreeMap<String, IntradayBar>>,

    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    // rate limit notice
    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Information")]
    pub information: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntradayBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}
