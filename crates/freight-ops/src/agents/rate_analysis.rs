use super::{Agent, AgentError, AgentKind, AgentOptions, AgentRuntime};
use crate::config::{AppConfig, RateThresholds};
use crate::decisions::Decision;
use crate::domain::LaneQuery;
use crate::llm::{CallBudget, Enrichment, ResponseContract};
use crate::metrics::lane;
use crate::scoring::{LaneOutlook, MarketTrend};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

const ANALYSIS_BUDGET: CallBudget = CallBudget::new(0.1, 1500);
/// Replies above this rate per mile are treated as nonsense.
const MAX_RECOMMENDED_RPM: Decimal = dec!(100);
const INSTRUCTIONS: &str = "Analyze this freight lane and provide rate recommendations. \
Include the recommended rate per mile, the market trend (rising/falling/stable), your confidence \
(0.0-1.0), the reasoning behind it, negotiation tips for dealing with brokers, and risk factors.";

impl ResponseContract for LaneOutlook {
    const SHAPE: &'static str = r#"{
    "recommended_rpm": <decimal>,
    "market_trend": "<rising|falling|stable>",
    "confidence": <0.0-1.0>,
    "reasoning": "<detailed analysis>",
    "negotiation_tips": ["<tip1>", "<tip2>"],
    "risk_factors": ["<risk1>", "<risk2>"]
}"#;

    fn validate(&self) -> Result<(), String> {
        if self.recommended_rpm <= Decimal::ZERO || self.recommended_rpm > MAX_RECOMMENDED_RPM {
            return Err(format!(
                "recommended rpm {} outside (0, {MAX_RECOMMENDED_RPM}]",
                self.recommended_rpm
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside 0-1", self.confidence));
        }
        Ok(())
    }
}

/// Pricing recommendation for a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAnalysisResult {
    pub lane_description: String,
    pub distance_miles: u32,

    pub current_market_rate: Option<Decimal>,
    pub recommended_rate: Decimal,
    pub minimum_acceptable_rate: Decimal,
    pub target_rate: Decimal,

    pub market_trend: MarketTrend,
    pub confidence_level: f64,
    pub reasoning: String,

    pub historical_average: Option<Decimal>,
    pub rate_range_low: Option<Decimal>,
    pub rate_range_high: Option<Decimal>,

    pub negotiation_tips: Vec<String>,
    pub risk_factors: Vec<String>,

    pub timestamp: DateTime<Utc>,
    pub execution_time_seconds: f64,
}

#[derive(Serialize)]
struct RateRules {
    minimum_rpm: Decimal,
    target_rpm: Decimal,
    cost_per_mile: Decimal,
}

#[derive(Serialize)]
struct HistoricalContext {
    average_rpm: Decimal,
    low_rpm: Decimal,
    high_rpm: Decimal,
    sample_size: usize,
}

#[derive(Serialize)]
struct LaneContext<'a> {
    lane: &'a str,
    distance_miles: u32,
    business_rules: RateRules,
    historical_data: Option<HistoricalContext>,
}

/// Recommends what to ask brokers for on a lane.
pub struct RateAnalysisAgent {
    runtime: AgentRuntime,
    thresholds: RateThresholds,
    cost_per_mile: Decimal,
}

impl RateAnalysisAgent {
    pub fn new(config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        Ok(Self {
            runtime: AgentRuntime::new(AgentKind::RateAnalysis, config, options)?,
            thresholds: config.business.rates,
            cost_per_mile: config.business.costs.cost_per_mile,
        })
    }

    pub async fn analyze_lane(&self, query: &LaneQuery) -> RateAnalysisResult {
        let started = Instant::now();
        let lane_description = query.description();
        info!(lane = %lane_description, distance = query.distance_miles, "analyzing_lane");

        let baseline = lane::baseline(query.distance_miles, &self.thresholds);
        let history = lane::summarize_history(&query.historical_rates);
        let totals = history.map(|summary| summary.lane_totals(query.distance_miles));

        let context = LaneContext {
            lane: &lane_description,
            distance_miles: query.distance_miles,
            business_rules: RateRules {
                minimum_rpm: baseline.minimum_rpm,
                target_rpm: baseline.target_rpm,
                cost_per_mile: self.cost_per_mile,
            },
            historical_data: history.map(|summary| HistoricalContext {
                average_rpm: summary.average_rpm,
                low_rpm: summary.low_rpm,
                high_rpm: summary.high_rpm,
                sample_size: summary.sample_size,
            }),
        };

        let enriched = self
            .runtime
            .enrich::<LaneOutlook, _>(INSTRUCTIONS, &context, ANALYSIS_BUDGET)
            .await;
        let quoted = match enriched {
            Enrichment::Enriched(outlook) => {
                match outlook.recommended_rpm.checked_mul(Decimal::from(query.distance_miles)) {
                    Some(rate) => Some((outlook, rate)),
                    None => {
                        warn!(
                            lane = %lane_description,
                            recommended_rpm = %outlook.recommended_rpm,
                            "lane_rate_overflow"
                        );
                        None
                    }
                }
            }
            Enrichment::Fallback { .. } => None,
        };
        let (outlook, recommended_rate) = quoted.unwrap_or_else(|| {
            (LaneOutlook::fallback(&self.thresholds), baseline.target_rate)
        });

        self.runtime.record(
            Decision::new(
                self.runtime.name(),
                "lane_rate_analysis",
                json!({ "lane": lane_description, "distance": query.distance_miles }),
                json!({
                    "recommended_rate": recommended_rate,
                    "market_trend": outlook.market_trend,
                }),
            )
            .with_reasoning(outlook.reasoning.clone())
            .with_confidence(outlook.confidence)
            .with_tools(&["llm_analysis", "historical_data", "business_rules"])
            .with_elapsed(started.elapsed()),
        );

        RateAnalysisResult {
            lane_description,
            distance_miles: query.distance_miles,
            current_market_rate: totals.map(|t| t.current_market_rate),
            recommended_rate,
            minimum_acceptable_rate: baseline.minimum_acceptable_rate,
            target_rate: baseline.target_rate,
            market_trend: outlook.market_trend,
            confidence_level: outlook.confidence,
            reasoning: outlook.reasoning,
            historical_average: totals.map(|t| t.historical_average),
            rate_range_low: totals.map(|t| t.rate_range_low),
            rate_range_high: totals.map(|t| t.rate_range_high),
            negotiation_tips: outlook.negotiation_tips,
            risk_factors: outlook.risk_factors,
            timestamp: Utc::now(),
            execution_time_seconds: started.elapsed().as_secs_f64(),
        }
    }

    /// Analyse several lanes, in the order given.
    pub async fn compare_rates(&self, lanes: &[LaneQuery]) -> Vec<RateAnalysisResult> {
        let mut results = Vec::with_capacity(lanes.len());
        for lane in lanes {
            results.push(self.analyze_lane(lane).await);
        }
        results
    }
}

#[async_trait]
impl Agent for RateAnalysisAgent {
    type Request = LaneQuery;
    type Output = RateAnalysisResult;

    fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    async fn execute(&self, request: LaneQuery) -> RateAnalysisResult {
        self.analyze_lane(&request).await
    }
}
