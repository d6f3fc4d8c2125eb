use chrono::{DateTime, Utc};

use crate::models::{AlertRecord, PriceMap};

/// Checks every pending record against the latest price for its symbol.
///
/// Records that fire are marked triggered (with `triggered_at = now`) and a
/// copy is returned alongside the price that fired them. Records that are
/// already triggered are never looked at again, and records whose symbol has
/// no price this cycle are left untouched.
pub fn evaluate<F>(
    records: &mut [AlertRecord],
    price_lookup: F,
    now: DateTime<Utc>,
) -> Vec<(AlertRecord, f64)>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut fired = Vec::new();

    for record in records.iter_mut().filter(|r| !r.triggered) {
        let Some(price) = price_lookup(&record.symbol) else {
            continue;
        };

        if !record.direction.is_hit(price, record.target_price) {
            continue;
        }

        record.triggered = true;
        record.triggered_at = Some(now);
        fired.push((record.clone(), price));
    }

    fired
}

/// Lookup over a poll cycle's price map.
pub fn lookup_in(prices: &PriceMap) -> impl Fn(&str) -> Option<f64> + '_ {
    move |symbol: &str| prices.get(symbol).map(|q| q.price)
}
