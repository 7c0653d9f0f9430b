use super::common::*;
use crate::agents::route_optimizer::{RouteOptimizerAgent, RouteRequest};
use crate::agents::{Agent, AgentOptions};
use crate::config::Coordinates;
use crate::domain::{Load, Location};
use rust_decimal_macros::dec;

fn tulsa() -> Location {
    Location::new("Tulsa", "OK").with_coordinates(36.1540, -95.9928)
}

fn dallas() -> Location {
    Location::new("Dallas", "TX").with_coordinates(32.7767, -96.7970)
}

fn request() -> RouteRequest {
    RouteRequest {
        origin: tulsa(),
        destination: dallas(),
        current_location: None,
        available_backhauls: Vec::new(),
    }
}

fn backhaul(id: &str, origin: Location, destination: Location) -> Load {
    let mut details = load_details(id, dec!(700), 260, 0);
    details.origin = origin;
    details.destination = destination;
    Load::new(details).expect("valid load")
}

#[tokio::test]
async fn named_selection_is_honored() {
    let generator = ScriptedGenerator::replying(&[
        r#"{"selected_route_name": "Toll-Free Route", "reasoning": "Avoids the turnpike."}"#,
    ]);
    let agent = RouteOptimizerAgent::new(&app_config(), &options_with(generator.clone()))
        .expect("route agent builds");

    let result = agent.optimize_route(&request()).await;

    assert_eq!(result.recommended_route.route_name, "Toll-Free Route");
    assert_eq!(result.reasoning, "Avoids the turnpike.");
    assert_eq!(result.alternative_routes.len(), 1);
    assert_eq!(result.alternative_routes[0].route_name, "Highway Route");

    let requests = generator.requests();
    assert_eq!(requests[0].temperature, 0.3);
    assert_eq!(requests[0].max_tokens, 512);
}

#[tokio::test]
async fn unknown_selection_falls_back_to_best_score() {
    let generator = ScriptedGenerator::replying(&[
        r#"{"selected_route_name": "Scenic Route", "reasoning": "Pretty."}"#,
    ]);
    let agent = RouteOptimizerAgent::new(&app_config(), &options_with(generator))
        .expect("route agent builds");

    let result = agent.optimize_route(&request()).await;

    assert_eq!(result.recommended_route.route_name, "Highway Route");
    assert_eq!(
        result.reasoning,
        "Selected highest-scored route: Highway Route"
    );
}

#[tokio::test]
async fn offline_selection_records_decision() {
    let agent = RouteOptimizerAgent::new(&app_config(), &AgentOptions::offline())
        .expect("route agent builds");

    let result = agent.execute(request()).await;
    assert_eq!(result.recommended_route.route_name, "Highway Route");
    assert!(result.backhaul_opportunities.is_empty());

    let decisions = agent.decisions().snapshot();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].decision_type, "route_optimization");
    assert_eq!(decisions[0].confidence, 0.85);
    assert_eq!(decisions[0].output_data["backhauls_found"], 0);
}

#[tokio::test]
async fn backhauls_are_matched_toward_the_return_point() {
    let agent = RouteOptimizerAgent::new(&app_config(), &AgentOptions::offline())
        .expect("route agent builds");

    let mut request = request();
    request.available_backhauls = vec![
        backhaul("BH-NEAR", dallas(), tulsa()),
        backhaul(
            "BH-FAR",
            Location::new("El Paso", "TX").with_coordinates(31.7619, -106.4850),
            Location::new("Phoenix", "AZ").with_coordinates(33.4484, -112.0740),
        ),
    ];

    let result = agent.optimize_route(&request).await;
    assert_eq!(result.backhaul_opportunities.len(), 1);
    assert_eq!(result.backhaul_opportunities[0].load.load_id(), "BH-NEAR");
    assert_eq!(result.backhaul_opportunities[0].deadhead_to_pickup, 0);
}

#[test]
fn deadhead_reduction_scores_against_home_base() {
    let mut config = app_config();
    config.business.home_base.city = "Tulsa".to_string();
    config.business.home_base.state = "OK".to_string();
    config.business.home_base.coordinates = Some(Coordinates {
        latitude: 36.1540,
        longitude: -95.9928,
    });
    let agent = RouteOptimizerAgent::new(&config, &AgentOptions::offline())
        .expect("route agent builds");

    let completed = backhaul("DONE-1", tulsa(), dallas());
    let opportunities = agent.calculate_deadhead_reduction(
        &completed,
        &[backhaul("BH-HOME", dallas(), tulsa())],
    );

    assert_eq!(opportunities.len(), 1);
    assert!(opportunities[0].compatibility_score > 50.0);
}
