use super::{Agent, AgentError, AgentKind, AgentOptions, AgentRuntime};
use crate::config::{AppConfig, RateThresholds};
use crate::decisions::Decision;
use crate::domain::Load;
use crate::llm::{CallBudget, Enrichment, ResponseContract};
use crate::metrics::{load_metrics, CostProfile, LoadMetrics};
use crate::scoring::{load_warnings, score_load, DispatchAssessment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::info;

const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;
const ANALYSIS_BUDGET: CallBudget = CallBudget::new(0.2, 1024);
const INSTRUCTIONS: &str = "Analyze this freight load and provide a recommendation. \
Give an overall score (0-100), detailed reasoning, the key pros and cons, and any warnings or concerns.";

impl ResponseContract for DispatchAssessment {
    const SHAPE: &'static str = r#"{
    "score": <number 0-100>,
    "reasoning": "<detailed analysis>",
    "pros": ["<pro1>", "<pro2>"],
    "cons": ["<con1>", "<con2>"],
    "warnings": ["<warning1>"]
}"#;

    fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(format!("score {} outside 0-100", self.score));
        }
        Ok(())
    }
}

/// Scored verdict on one load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecommendation {
    pub load: Load,
    /// 0-100, higher is better.
    pub score: f64,
    pub reasoning: String,
    pub profitability_metrics: LoadMetrics,
    pub warnings: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub loads: Vec<Load>,
    pub max_recommendations: usize,
}

impl DispatchRequest {
    pub fn new(loads: Vec<Load>) -> Self {
        Self {
            loads,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub timestamp: DateTime<Utc>,
    pub loads_analyzed: usize,
    /// Highest score first.
    pub recommendations: Vec<LoadRecommendation>,
    pub top_recommendation: Option<LoadRecommendation>,
    pub execution_time_seconds: f64,
}

#[derive(Serialize)]
struct BusinessRules {
    minimum_rate_per_mile: Decimal,
    target_rate_per_mile: Decimal,
    max_deadhead_percentage: Decimal,
    cost_per_mile: Decimal,
}

#[derive(Serialize)]
struct SpecialRequirements {
    hazmat: bool,
    team_required: bool,
    expedited: bool,
    requires_tarp: bool,
}

#[derive(Serialize)]
struct LoadContext<'a> {
    load_id: &'a str,
    origin: String,
    destination: String,
    pickup_date: DateTime<Utc>,
    delivery_date: DateTime<Utc>,
    commodity: &'a str,
    weight: u32,
    equipment_type: &'a str,
    metrics: &'a LoadMetrics,
    special_requirements: SpecialRequirements,
    business_rules: BusinessRules,
}

/// Ranks loads by profitability and fit.
pub struct DispatchAgent {
    runtime: AgentRuntime,
    thresholds: RateThresholds,
    costs: CostProfile,
    max_weight_lbs: u32,
}

impl DispatchAgent {
    pub fn new(config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        Ok(Self {
            runtime: AgentRuntime::new(AgentKind::Dispatch, config, options)?,
            thresholds: config.business.rates,
            costs: config.business.cost_profile(),
            max_weight_lbs: config.business.equipment.trailer.max_weight_lbs,
        })
    }

    pub async fn analyze_load(&self, load: &Load) -> LoadRecommendation {
        let started = Instant::now();

        let metrics = load_metrics(load, &self.costs);
        let warnings = load_warnings(load, &metrics, &self.thresholds, self.max_weight_lbs);
        let context = self.load_context(load, &metrics);

        let assessment = match self
            .runtime
            .enrich::<DispatchAssessment, _>(INSTRUCTIONS, &context, ANALYSIS_BUDGET)
            .await
        {
            Enrichment::Enriched(mut assessment) => {
                assessment.warnings.extend(warnings);
                assessment
            }
            Enrichment::Fallback { .. } => {
                let card = score_load(load, &metrics, &self.thresholds);
                DispatchAssessment {
                    warnings,
                    ..DispatchAssessment::from_score_card(&card)
                }
            }
        };

        self.runtime.record(
            Decision::new(
                self.runtime.name(),
                "load_analysis",
                json!({ "load_id": load.load_id() }),
                json!({ "score": assessment.score, "warnings": assessment.warnings }),
            )
            .with_reasoning(assessment.reasoning.clone())
            .with_confidence(assessment.score / 100.0)
            .with_tools(&["llm_analysis", "profitability_calculator"])
            .with_elapsed(started.elapsed()),
        );

        LoadRecommendation {
            load: load.clone(),
            score: assessment.score,
            reasoning: assessment.reasoning,
            profitability_metrics: metrics,
            warnings: assessment.warnings,
            pros: assessment.pros,
            cons: assessment.cons,
        }
    }

    fn load_context<'a>(&self, load: &'a Load, metrics: &'a LoadMetrics) -> LoadContext<'a> {
        let details = load.details();
        LoadContext {
            load_id: load.load_id(),
            origin: load.origin().to_string(),
            destination: load.destination().to_string(),
            pickup_date: details.pickup_date,
            delivery_date: details.delivery_date,
            commodity: &details.commodity,
            weight: load.weight(),
            equipment_type: &details.equipment_type,
            metrics,
            special_requirements: SpecialRequirements {
                hazmat: load.is_hazmat(),
                team_required: load.is_team_required(),
                expedited: load.is_expedited(),
                requires_tarp: load.requires_tarp(),
            },
            business_rules: BusinessRules {
                minimum_rate_per_mile: self.thresholds.minimum_rate_per_mile,
                target_rate_per_mile: self.thresholds.target_rate_per_mile,
                max_deadhead_percentage: self.thresholds.max_deadhead_percentage,
                cost_per_mile: self.costs.cost_per_mile,
            },
        }
    }
}

#[async_trait]
impl Agent for DispatchAgent {
    type Request = DispatchRequest;
    type Output = DispatchResult;

    fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    /// Analyse every load, then keep the best `max_recommendations`.
    async fn execute(&self, request: DispatchRequest) -> DispatchResult {
        let started = Instant::now();
        info!(load_count = request.loads.len(), "dispatch_execution_started");

        let mut recommendations = Vec::with_capacity(request.loads.len());
        for load in &request.loads {
            recommendations.push(self.analyze_load(load).await);
        }

        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations.truncate(request.max_recommendations);
        let top_recommendation = recommendations.first().cloned();

        info!(
            loads_analyzed = request.loads.len(),
            recommendations_count = recommendations.len(),
            top_score = top_recommendation.as_ref().map_or(0.0, |top| top.score),
            "dispatch_execution_completed"
        );

        DispatchResult {
            timestamp: Utc::now(),
            loads_analyzed: request.loads.len(),
            recommendations,
            top_recommendation,
            execution_time_seconds: started.elapsed().as_secs_f64(),
        }
    }
}
