use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use crate::models::{AlertRecord, Direction, NewAlert, PriceMap, TriggeredAlert};
use crate::services::evaluator::{self, lookup_in};

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,19}$").expect("symbol regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Please enter a valid stock symbol.")]
    InvalidSymbol,
    #[error("Please enter a valid target price.")]
    InvalidPrice,
    #[error("Please choose a valid direction.")]
    InvalidDirection,
    #[error("Please enter a recipient for the alert.")]
    EmptyRecipient,
}

pub fn normalize_symbol(raw: &str) -> Result<String, AlertError> {
    let sym = raw.trim().to_uppercase();
    if SYMBOL_RE.is_match(&sym) {
        Ok(sym)
    } else {
        Err(AlertError::InvalidSymbol)
    }
}

/// Checks raw form input. Nothing is created when this fails.
pub fn validate(
    symbol: &str,
    target_price: &str,
    direction: &str,
    recipient: &str,
) -> Result<NewAlert, AlertError> {
    let symbol = normalize_symbol(symbol)?;

    let target_price: f64 = target_price
        .trim()
        .parse()
        .map_err(|_| AlertError::InvalidPrice)?;
    if !target_price.is_finite() || target_price <= 0.0 {
        return Err(AlertError::InvalidPrice);
    }

    let direction = Direction::parse(direction).ok_or(AlertError::InvalidDirection)?;

    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(AlertError::EmptyRecipient);
    }

    Ok(NewAlert {
        symbol,
        target_price,
        direction,
        recipient: recipient.to_string(),
    })
}

/// Evaluator-owned alert collection plus the trigger history and watchlist.
/// Lives behind one lock in `AppState`; nothing here is persisted.
#[derive(Debug, Default)]
pub struct AlertBook {
    alerts: Vec<AlertRecord>,
    history: Vec<TriggeredAlert>,
    watchlist: Vec<String>,
    // never reset, ids stay unique across bulk clears
    last_id: u64,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, new: NewAlert) -> AlertRecord {
        self.create_at(new, Utc::now())
    }

    pub fn create_at(&mut self, new: NewAlert, now: DateTime<Utc>) -> AlertRecord {
        self.last_id += 1;

        let record = AlertRecord {
            id: self.last_id,
            symbol: new.symbol,
            target_price: new.target_price,
            direction: new.direction,
            recipient: new.recipient,
            created_at: now,
            triggered: false,
            triggered_at: None,
        };

        self.alerts.push(record.clone());
        record
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    pub fn pending_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.triggered).count()
    }

    /// Bulk clear. Returns how many records were removed.
    pub fn clear_all(&mut self) -> usize {
        let n = self.alerts.len();
        self.alerts.clear();
        n
    }

    pub fn history(&self) -> &[TriggeredAlert] {
        &self.history
    }

    pub fn clear_history(&mut self) -> usize {
        let n = self.history.len();
        self.history.clear();
        n
    }

    /// Symbols the poller should fetch: pending alerts first, then the watchlist.
    pub fn symbols_of_interest(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let pending = self.alerts.iter().filter(|a| !a.triggered).map(|a| &a.symbol);

        for sym in pending.chain(self.watchlist.iter()) {
            if !out.contains(sym) {
                out.push(sym.clone());
            }
        }
        out
    }

    /// Runs the evaluator over this book and appends one history row per
    /// trigger. Returns the newly triggered records with their firing price.
    pub fn evaluate(&mut self, prices: &PriceMap, now: DateTime<Utc>) -> Vec<(AlertRecord, f64)> {
        let fired = evaluator::evaluate(&mut self.alerts, lookup_in(prices), now);

        for (record, price) in &fired {
            self.history.push(TriggeredAlert::from_record(record, *price));
        }

        fired
    }

    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    /// Returns false when the symbol was already on the list.
    pub fn watch(&mut self, symbol: String) -> bool {
        if self.watchlist.contains(&symbol) {
            return false;
        }
        self.watchlist.push(symbol);
        true
    }

    pub fn unwatch(&mut self, symbol: &str) -> bool {
        let before = self.watchlist.len();
        self.watchlist.retain(|s| s != symbol);
        self.watchlist.len() != before
    }
}
