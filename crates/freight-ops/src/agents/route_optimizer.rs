use super::{Agent, AgentError, AgentKind, AgentOptions, AgentRuntime};
use crate::config::AppConfig;
use crate::decisions::Decision;
use crate::domain::{Load, Location};
use crate::llm::{CallBudget, Enrichment, ResponseContract};
use crate::metrics::route::{self, BackhaulOpportunity, RouteOption};
use crate::metrics::CostProfile;
use crate::scoring::{best_scored_route, RouteSelection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::info;

const SELECTION_BUDGET: CallBudget = CallBudget::new(0.3, 512);
const INSTRUCTIONS: &str = "Analyze these route options and select the best one. Consider total cost \
(fuel + tolls), time efficiency, road conditions and safety, and driver comfort.";

impl ResponseContract for RouteSelection {
    const SHAPE: &'static str = r#"{
    "selected_route_name": "<route name>",
    "reasoning": "<explanation>"
}"#;

    fn validate(&self) -> Result<(), String> {
        if self.selected_route_name.trim().is_empty() {
            return Err("selected_route_name is empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Location,
    pub destination: Location,
    /// Where the truck is now; defaults to the origin.
    #[serde(default)]
    pub current_location: Option<Location>,
    #[serde(default)]
    pub available_backhauls: Vec<Load>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOptimizationResult {
    pub origin: Location,
    pub destination: Location,
    pub recommended_route: RouteOption,
    pub alternative_routes: Vec<RouteOption>,
    pub backhaul_opportunities: Vec<BackhaulOpportunity>,
    pub reasoning: String,
    pub execution_time_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct RouteSummary<'a> {
    name: &'a str,
    distance: u32,
    time_hours: f64,
    fuel_cost: Decimal,
    toll_cost: Decimal,
    total_cost: Decimal,
    advantages: &'a [String],
    disadvantages: &'a [String],
}

#[derive(Serialize)]
struct RouteContext<'a> {
    origin: String,
    destination: String,
    routes: Vec<RouteSummary<'a>>,
}

/// Chooses between candidate routes and finds backhauls to cut empty miles.
pub struct RouteOptimizerAgent {
    runtime: AgentRuntime,
    costs: CostProfile,
    home_base: Location,
}

impl RouteOptimizerAgent {
    pub fn new(config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        Ok(Self {
            runtime: AgentRuntime::new(AgentKind::RouteOptimizer, config, options)?,
            costs: config.business.cost_profile(),
            home_base: config.business.home_base.location(),
        })
    }

    pub async fn optimize_route(&self, request: &RouteRequest) -> RouteOptimizationResult {
        let started = Instant::now();
        info!(
            origin = %request.origin,
            destination = %request.destination,
            "optimizing_route"
        );

        let options = route::route_options(&request.origin, &request.destination, &self.costs);

        let backhaul_opportunities = if request.available_backhauls.is_empty() {
            Vec::new()
        } else {
            let return_location = request.current_location.as_ref().unwrap_or(&request.origin);
            route::analyze_backhauls(
                &request.destination,
                return_location,
                &request.available_backhauls,
            )
        };

        let (recommended_index, reasoning) = self.select_route(request, &options).await;

        let mut alternative_routes = options;
        let recommended_route = alternative_routes.remove(recommended_index);

        self.runtime.record(
            Decision::new(
                self.runtime.name(),
                "route_optimization",
                json!({
                    "origin": request.origin.to_string(),
                    "destination": request.destination.to_string(),
                }),
                json!({
                    "total_miles": recommended_route.total_distance_miles,
                    "total_cost": recommended_route.total_cost,
                    "backhauls_found": backhaul_opportunities.len(),
                }),
            )
            .with_reasoning(format!("Selected {}", recommended_route.route_name))
            .with_confidence(f64::from(recommended_route.score) / 100.0)
            .with_tools(&["route_calculator", "llm_analysis", "backhaul_matcher"])
            .with_elapsed(started.elapsed()),
        );

        RouteOptimizationResult {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            recommended_route,
            alternative_routes,
            backhaul_opportunities,
            reasoning,
            execution_time_seconds: started.elapsed().as_secs_f64(),
            timestamp: Utc::now(),
        }
    }

    /// Backhauls from a finished load's delivery point, scored against the home base.
    pub fn calculate_deadhead_reduction(
        &self,
        completed_load: &Load,
        potential_backhauls: &[Load],
    ) -> Vec<BackhaulOpportunity> {
        route::analyze_backhauls(
            completed_load.destination(),
            &self.home_base,
            potential_backhauls,
        )
    }

    /// Index into `options` plus the reasoning behind it. Unknown names from
    /// the model fall back to the best-scored option.
    async fn select_route(&self, request: &RouteRequest, options: &[RouteOption]) -> (usize, String) {
        let context = RouteContext {
            origin: request.origin.to_string(),
            destination: request.destination.to_string(),
            routes: options
                .iter()
                .map(|option| RouteSummary {
                    name: &option.route_name,
                    distance: option.total_distance_miles,
                    time_hours: option.total_time_hours,
                    fuel_cost: option.total_fuel_cost,
                    toll_cost: option.total_toll_cost,
                    total_cost: option.total_cost,
                    advantages: &option.advantages,
                    disadvantages: &option.disadvantages,
                })
                .collect(),
        };

        if let Enrichment::Enriched(selection) = self
            .runtime
            .enrich::<RouteSelection, _>(INSTRUCTIONS, &context, SELECTION_BUDGET)
            .await
        {
            if let Some(index) = options
                .iter()
                .position(|option| option.route_name == selection.selected_route_name)
            {
                return (index, selection.reasoning);
            }
            info!(
                selected = %selection.selected_route_name,
                "route_selection_unrecognized"
            );
        }

        let index = best_scored_route(options)
            .and_then(|best| options.iter().position(|option| option.route_name == best.route_name))
            .unwrap_or(0);
        let reasoning = format!(
            "Selected highest-scored route: {}",
            options[index].route_name
        );
        (index, reasoning)
    }
}

#[async_trait]
impl Agent for RouteOptimizerAgent {
    type Request = RouteRequest;
    type Output = RouteOptimizationResult;

    fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    async fn execute(&self, request: RouteRequest) -> RouteOptimizationResult {
        self.optimize_route(&request).await
    }
}
