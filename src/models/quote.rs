use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,

    // provider timestamp when known, otherwise fetch time
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(symbol: impl Into<String>, price: f64, as_of: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            as_of,
        }
    }
}

/// Latest quote per symbol, as produced by one poll cycle.
pub type PriceMap = HashMap<String, PriceQuote>;
