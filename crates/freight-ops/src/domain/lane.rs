use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Observed rate for an origin/destination pair at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRate {
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub distance_miles: u32,
    pub rate_per_mile: Decimal,
    pub total_rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Lane to price, with any rate history available for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneQuery {
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub distance_miles: u32,
    #[serde(default)]
    pub historical_rates: Vec<LaneRate>,
}

impl LaneQuery {
    pub fn description(&self) -> String {
        format!(
            "{}, {} → {}, {}",
            self.origin_city, self.origin_state, self.destination_city, self.destination_state
        )
    }
}
