//! Rule-based fallbacks used whenever enrichment is unavailable.
//!
//! Each fallback returns the same assessment type the enrichment contract
//! decodes into, so agents build results the same way on either path.

mod dispatch;
mod lane;
mod route;

pub use dispatch::{load_warnings, score_load, DispatchAssessment};
pub use lane::{LaneOutlook, MarketTrend};
pub use route::{best_scored_route, RouteSelection};

use serde::{Deserialize, Serialize};

/// Reasoning text attached to every fallback result.
pub const FALLBACK_REASONING: &str = "Analysis based on business rules (LLM unavailable)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    RatePerMile,
    Deadhead,
    ProfitMargin,
    Hazmat,
    TeamRequired,
    Tarp,
    Expedited,
}

/// Discrete adjustment applied to the base score, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: i16,
    pub notes: String,
}

/// Composite rule score with its decision trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub components: Vec<ScoreComponent>,
    /// Base score plus every component, clamped to 0-100.
    pub total: u8,
}

impl ScoreCard {
    pub fn pros(&self) -> Vec<String> {
        self.components
            .iter()
            .filter(|component| component.score > 0)
            .map(|component| component.notes.clone())
            .collect()
    }

    pub fn cons(&self) -> Vec<String> {
        self.components
            .iter()
            .filter(|component| component.score < 0)
            .map(|component| component.notes.clone())
            .collect()
    }
}
