use crate::config::RateThresholds;
use crate::domain::LaneRate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rate floor and target for a lane, straight from the configured rpm bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneBaseline {
    pub minimum_rpm: Decimal,
    pub target_rpm: Decimal,
    pub minimum_acceptable_rate: Decimal,
    pub target_rate: Decimal,
}

pub fn baseline(distance_miles: u32, thresholds: &RateThresholds) -> LaneBaseline {
    let distance = Decimal::from(distance_miles);
    LaneBaseline {
        minimum_rpm: thresholds.minimum_rate_per_mile,
        target_rpm: thresholds.target_rate_per_mile,
        minimum_acceptable_rate: thresholds.minimum_rate_per_mile * distance,
        target_rate: thresholds.target_rate_per_mile * distance,
    }
}

/// Statistics over observed rates for a lane, in rate-per-mile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub average_rpm: Decimal,
    pub low_rpm: Decimal,
    pub high_rpm: Decimal,
    /// Rate per mile of the most recent observation.
    pub latest_rpm: Decimal,
    pub sample_size: usize,
}

impl HistoricalSummary {
    /// Scale every per-mile figure to a whole-lane amount.
    pub fn lane_totals(&self, distance_miles: u32) -> LaneTotals {
        let distance = Decimal::from(distance_miles);
        LaneTotals {
            current_market_rate: self.latest_rpm * distance,
            historical_average: self.average_rpm * distance,
            rate_range_low: self.low_rpm * distance,
            rate_range_high: self.high_rpm * distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneTotals {
    pub current_market_rate: Decimal,
    pub historical_average: Decimal,
    pub rate_range_low: Decimal,
    pub rate_range_high: Decimal,
}

/// `None` when there is no history to summarise.
pub fn summarize_history(history: &[LaneRate]) -> Option<HistoricalSummary> {
    let latest = history.iter().max_by_key(|rate| rate.timestamp)?;

    let mut low = latest.rate_per_mile;
    let mut high = latest.rate_per_mile;
    let mut sum = Decimal::ZERO;
    for rate in history {
        low = low.min(rate.rate_per_mile);
        high = high.max(rate.rate_per_mile);
        sum += rate.rate_per_mile;
    }

    Some(HistoricalSummary {
        average_rpm: sum / Decimal::from(history.len()),
        low_rpm: low,
        high_rpm: high,
        latest_rpm: latest.rate_per_mile,
        sample_size: history.len(),
    })
}
