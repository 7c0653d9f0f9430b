use super::FALLBACK_REASONING;
use crate::config::RateThresholds;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketTrend::Rising => write!(f, "rising"),
            MarketTrend::Falling => write!(f, "falling"),
            MarketTrend::Stable => write!(f, "stable"),
        }
    }
}

/// Pricing view of a lane: the rpm to ask for and how to negotiate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneOutlook {
    pub recommended_rpm: Decimal,
    pub market_trend: MarketTrend,
    /// 0.0-1.0
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub negotiation_tips: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

impl LaneOutlook {
    /// Quote the configured target rate and hold firm.
    pub fn fallback(thresholds: &RateThresholds) -> Self {
        Self {
            recommended_rpm: thresholds.target_rate_per_mile,
            market_trend: MarketTrend::Stable,
            confidence: 0.5,
            reasoning: FALLBACK_REASONING.to_string(),
            negotiation_tips: vec![
                "Stick to target rate".to_string(),
                "Be prepared to walk away".to_string(),
            ],
            risk_factors: vec!["Limited market data".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fallback_quotes_target_rate() {
        let outlook = LaneOutlook::fallback(&RateThresholds::default());
        assert_eq!(outlook.recommended_rpm, dec!(2.5));
        assert_eq!(outlook.market_trend, MarketTrend::Stable);
        assert_eq!(outlook.confidence, 0.5);
        assert_eq!(outlook.risk_factors, vec!["Limited market data"]);
    }

    #[test]
    fn trend_uses_lowercase_names() {
        let trend: MarketTrend = serde_json::from_str("\"rising\"").expect("parses");
        assert_eq!(trend, MarketTrend::Rising);
        assert!(serde_json::from_str::<MarketTrend>("\"sideways\"").is_err());
    }
}
