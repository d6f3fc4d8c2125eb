use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    RisesTo,
    FallsTo,
}

impl Direction {
    /// Whether `price` satisfies this direction against `target`.
    pub fn is_hit(self, price: f64, target: f64) -> bool {
        match self {
            Direction::RisesTo => price >= target,
            Direction::FallsTo => price <= target,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::RisesTo => "Price rises to target",
            Direction::FallsTo => "Price falls to target",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::RisesTo => "rises_to",
            Direction::FallsTo => "falls_to",
        }
    }

    /// Accepts the form values used by the dashboard ("rises"/"falls") as well
    /// as the older "above"/"below" wording.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rises" | "rises_to" | "above" | "up" => Some(Direction::RisesTo),
            "falls" | "falls_to" | "below" | "down" => Some(Direction::FallsTo),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for a new alert. The id and timestamps are assigned by the
/// alert book.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub symbol: String,
    pub target_price: f64,
    pub direction: Direction,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: u64,
    pub symbol: String,
    pub target_price: f64,
    pub direction: Direction,
    pub recipient: String,

    pub created_at: DateTime<Utc>,

    // false -> true exactly once
    pub triggered: bool,
    pub triggered_at: Option<DateTime<Utc>>,
}

/// One row of the trigger history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub id: u64,
    pub symbol: String,
    pub target_price: f64,
    pub actual_price: f64,
    pub direction: Direction,
    pub recipient: String,
    pub triggered_at: DateTime<Utc>,
}

impl TriggeredAlert {
    pub fn from_record(record: &AlertRecord, actual_price: f64) -> Self {
        Self {
            id: record.id,
            symbol: record.symbol.clone(),
            target_price: record.target_price,
            actual_price,
            direction: record.direction,
            recipient: record.recipient.clone(),
            triggered_at: record.triggered_at.unwrap_or_else(Utc::now),
        }
    }
}
