use super::{ScoreCard, ScoreComponent, ScoreFactor, FALLBACK_REASONING};
use crate::config::RateThresholds;
use crate::domain::Load;
use crate::metrics::LoadMetrics;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const BASE_SCORE: i16 = 50;
const LOW_DEADHEAD_PCT: Decimal = dec!(10);
const STRONG_MARGIN_PCT: Decimal = dec!(50);
const HEALTHY_MARGIN_PCT: Decimal = dec!(30);
const THIN_MARGIN_PCT: Decimal = dec!(10);

/// Score, narrative and concerns for a single load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchAssessment {
    /// 0-100, higher is better.
    pub score: f64,
    pub reasoning: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl DispatchAssessment {
    pub fn from_score_card(card: &ScoreCard) -> Self {
        Self {
            score: f64::from(card.total),
            reasoning: FALLBACK_REASONING.to_string(),
            pros: card.pros(),
            cons: card.cons(),
            warnings: Vec::new(),
        }
    }
}

/// Deterministic load score: starts at 50, adjusts for rate, deadhead,
/// margin and special handling, then clamps to 0-100.
pub fn score_load(load: &Load, metrics: &LoadMetrics, thresholds: &RateThresholds) -> ScoreCard {
    let mut components = Vec::new();

    let rpm = metrics.rate_per_loaded_mile;
    let rate_component = if rpm < thresholds.minimum_rate_per_mile {
        (-30, format!(
            "rate ${:.2}/mi below minimum ${}",
            rpm, thresholds.minimum_rate_per_mile
        ))
    } else if rpm >= thresholds.premium_rate_per_mile {
        (30, format!(
            "rate ${:.2}/mi at or above premium ${}",
            rpm, thresholds.premium_rate_per_mile
        ))
    } else if rpm >= thresholds.target_rate_per_mile {
        (20, format!(
            "rate ${:.2}/mi meets target ${}",
            rpm, thresholds.target_rate_per_mile
        ))
    } else {
        (10, format!("rate ${:.2}/mi between minimum and target", rpm))
    };
    components.push(component(ScoreFactor::RatePerMile, rate_component));

    let deadhead = metrics.deadhead_percentage;
    let deadhead_component = if deadhead <= LOW_DEADHEAD_PCT {
        (20, format!("deadhead {:.1}% at or below {}%", deadhead, LOW_DEADHEAD_PCT))
    } else if deadhead <= thresholds.max_deadhead_percentage {
        (10, format!(
            "deadhead {:.1}% within maximum {}%",
            deadhead, thresholds.max_deadhead_percentage
        ))
    } else {
        (-20, format!(
            "deadhead {:.1}% exceeds maximum {}%",
            deadhead, thresholds.max_deadhead_percentage
        ))
    };
    components.push(component(ScoreFactor::Deadhead, deadhead_component));

    let margin = metrics.profit_margin_pct;
    if margin >= STRONG_MARGIN_PCT {
        components.push(component(
            ScoreFactor::ProfitMargin,
            (20, format!("profit margin {:.1}% is strong", margin)),
        ));
    } else if margin >= HEALTHY_MARGIN_PCT {
        components.push(component(
            ScoreFactor::ProfitMargin,
            (10, format!("profit margin {:.1}% is healthy", margin)),
        ));
    } else if margin < THIN_MARGIN_PCT {
        components.push(component(
            ScoreFactor::ProfitMargin,
            (-20, format!("profit margin {:.1}% is thin", margin)),
        ));
    }

    if load.is_hazmat() {
        components.push(component(ScoreFactor::Hazmat, (-5, "hazmat handling".into())));
    }
    if load.is_team_required() {
        components.push(component(
            ScoreFactor::TeamRequired,
            (-10, "team drivers required".into()),
        ));
    }
    if load.requires_tarp() {
        components.push(component(ScoreFactor::Tarp, (-5, "tarping required".into())));
    }
    if load.is_expedited() {
        components.push(component(
            ScoreFactor::Expedited,
            (10, "expedited premium".into()),
        ));
    }

    let raw: i16 = BASE_SCORE + components.iter().map(|c| c.score).sum::<i16>();
    ScoreCard {
        components,
        total: raw.clamp(0, 100) as u8,
    }
}

fn component(factor: ScoreFactor, (score, notes): (i16, String)) -> ScoreComponent {
    ScoreComponent {
        factor,
        score,
        notes,
    }
}

/// Threshold checks reported on every dispatch result, enriched or not.
pub fn load_warnings(
    load: &Load,
    metrics: &LoadMetrics,
    thresholds: &RateThresholds,
    max_weight_lbs: u32,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if metrics.rate_per_loaded_mile < thresholds.minimum_rate_per_mile {
        warnings.push(format!(
            "Rate per mile (${:.2}) below minimum (${})",
            metrics.rate_per_loaded_mile, thresholds.minimum_rate_per_mile
        ));
    }
    if metrics.deadhead_percentage > thresholds.max_deadhead_percentage {
        warnings.push(format!(
            "Deadhead ({:.1}%) exceeds maximum ({}%)",
            metrics.deadhead_percentage, thresholds.max_deadhead_percentage
        ));
    }
    if metrics.net_profit < Decimal::ZERO {
        warnings.push(format!(
            "Load is unprofitable: ${:.2} loss",
            metrics.net_profit
        ));
    }
    if load.weight() > max_weight_lbs {
        warnings.push(format!(
            "Load weight ({} lbs) exceeds trailer capacity ({} lbs)",
            load.weight(),
            max_weight_lbs
        ));
    }
    if load.is_hazmat() {
        warnings.push("Requires HAZMAT certification".to_string());
    }
    if load.is_team_required() {
        warnings.push("Requires team drivers".to_string());
    }

    warnings
}
