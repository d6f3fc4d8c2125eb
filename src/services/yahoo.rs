use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::PriceQuote;
use crate::services::price_source::{ensure_usable, PriceError, PriceSource};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Clone)]
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn with_http(http: Client) -> Self {
        Self { http }
    }

    pub async fn chart(&self, symbol: &str) -> Result<ChartResponse, PriceError> {
        let url = format!("{CHART_URL}/{symbol}");
        let res = self
            .http
            .get(&url)
            .query(&[("range", "1d"), ("interval", "5m")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PriceError::Timeout(symbol.to_string())
                } else {
                    PriceError::unavailable(symbol, e.to_string())
                }
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PriceError::unavailable(
                symbol,
                format!("Yahoo chart failed: {status} {body}"),
            ));
        }

        res.json::<ChartResponse>()
            .await
            .map_err(|e| PriceError::unavailable(symbol, e.to_string()))
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        let resp = self.chart(symbol).await?;
        market_price(symbol, &resp)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

pub fn market_price(symbol: &str, resp: &ChartResponse) -> Result<PriceQuote, PriceError> {
    if let Some(err) = &resp.chart.error {
        return Err(PriceError::unavailable(
            symbol,
            format!("{}: {}", err.code, err.description),
        ));
    }

    let Some(meta) = resp
        .chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .map(|r| &r.meta)
    else {
        return Err(PriceError::unavailable(symbol, "empty chart result"));
    };

    let Some(price) = meta.regular_market_price else {
        return Err(PriceError::unavailable(symbol, "no regularMarketPrice"));
    };

    let as_of = meta
        .regular_market_time
        .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        .unwrap_or_else(Utc::now);

    ensure_usable(PriceQuote::new(symbol, price, as_of))
}

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    // unix seconds
    pub regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}
