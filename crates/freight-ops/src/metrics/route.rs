use crate::domain::{Load, Location};
use crate::metrics::profitability::CostProfile;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3959.0;
const ROAD_FACTOR: f64 = 1.2;
/// Used when either end lacks coordinates.
pub const DEFAULT_DISTANCE_MILES: u32 = 250;

const HIGHWAY_AVERAGE_MPH: f64 = 55.0;
const TOLL_FREE_AVERAGE_MPH: f64 = 50.0;
const TOLL_FREE_DETOUR: f64 = 1.1;
const HIGHWAY_TOLLS: Decimal = dec!(15.00);

const MAX_BACKHAULS: usize = 5;
const BACKHAUL_HOME_RADIUS_MILES: u32 = 50;
const BACKHAUL_MIN_COMPATIBILITY: f64 = 50.0;

/// Road-distance estimate: great-circle miles inflated by a road factor.
pub fn estimate_distance(from: &Location, to: &Location) -> u32 {
    let (Some((lat1, lon1)), Some((lat2, lon2))) = (from.coordinates(), to.coordinates()) else {
        return DEFAULT_DISTANCE_MILES;
    };

    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_MILES * c * ROAD_FACTOR) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub start_location: Location,
    pub end_location: Location,
    pub distance_miles: u32,
    pub estimated_time_hours: f64,
    pub fuel_cost: Decimal,
    pub toll_cost: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub route_name: String,
    pub segments: Vec<RouteSegment>,
    pub total_distance_miles: u32,
    pub total_time_hours: f64,
    pub total_fuel_cost: Decimal,
    pub total_toll_cost: Decimal,
    pub total_cost: Decimal,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    /// 0-100, higher is better.
    pub score: u8,
}

struct RoutePlan<'a> {
    name: &'a str,
    description: &'a str,
    distance_miles: u32,
    hours: f64,
    fuel_cost: Decimal,
    toll_cost: Decimal,
    advantages: &'a [&'a str],
    disadvantages: &'a [&'a str],
    score: u8,
}

fn build_option(origin: &Location, destination: &Location, plan: RoutePlan<'_>) -> RouteOption {
    RouteOption {
        route_name: plan.name.to_string(),
        segments: vec![RouteSegment {
            start_location: origin.clone(),
            end_location: destination.clone(),
            distance_miles: plan.distance_miles,
            estimated_time_hours: plan.hours,
            fuel_cost: plan.fuel_cost,
            toll_cost: plan.toll_cost,
            description: plan.description.to_string(),
        }],
        total_distance_miles: plan.distance_miles,
        total_time_hours: plan.hours,
        total_fuel_cost: plan.fuel_cost,
        total_toll_cost: plan.toll_cost,
        total_cost: plan.fuel_cost + plan.toll_cost,
        advantages: plan.advantages.iter().map(|s| s.to_string()).collect(),
        disadvantages: plan.disadvantages.iter().map(|s| s.to_string()).collect(),
        score: plan.score,
    }
}

/// Candidate routes between two points: a tolled highway and a longer toll-free path.
///
/// Distances come from [`estimate_distance`]; there is no routing service behind this.
pub fn route_options(
    origin: &Location,
    destination: &Location,
    costs: &CostProfile,
) -> Vec<RouteOption> {
    let distance = estimate_distance(origin, destination);
    let fuel_cost = if costs.truck_mpg.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::from(distance) * costs.fuel_price_per_gallon / costs.truck_mpg
    };
    let detour_miles = f64::from(distance) * TOLL_FREE_DETOUR;

    let highway = build_option(
        origin,
        destination,
        RoutePlan {
            name: "Primary Highway Route",
            description: "Interstate highway route",
            distance_miles: distance,
            hours: f64::from(distance) / HIGHWAY_AVERAGE_MPH,
            fuel_cost,
            toll_cost: HIGHWAY_TOLLS,
            advantages: &["Fastest route", "Well-maintained roads", "Easy navigation"],
            disadvantages: &["Toll roads", "Higher fuel cost"],
            score: 85,
        },
    );

    let toll_free = build_option(
        origin,
        destination,
        RoutePlan {
            name: "Toll-Free Route",
            description: "Highway route avoiding tolls",
            distance_miles: detour_miles as u32,
            hours: detour_miles / TOLL_FREE_AVERAGE_MPH,
            fuel_cost: fuel_cost * dec!(1.1),
            toll_cost: Decimal::ZERO,
            advantages: &["No tolls", "Lower overall cost"],
            disadvantages: &["Longer distance", "More time"],
            score: 75,
        },
    );

    vec![highway, toll_free]
}

/// Load that could be hauled back instead of running empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackhaulOpportunity {
    pub load: Load,
    pub deadhead_to_pickup: u32,
    pub compatibility_score: f64,
    pub reasoning: String,
}

/// Rank candidate backhauls from where the truck empties out.
///
/// Long repositioning runs lose compatibility, loads delivering close to the
/// return location gain it. Only the best five above 50 are kept.
pub fn analyze_backhauls(
    current_destination: &Location,
    return_location: &Location,
    candidates: &[Load],
) -> Vec<BackhaulOpportunity> {
    let mut opportunities: Vec<BackhaulOpportunity> = candidates
        .iter()
        .filter_map(|load| {
            let deadhead = estimate_distance(current_destination, load.origin());

            let mut compatibility = 100.0;
            if deadhead > 100 {
                compatibility -= (f64::from(deadhead - 100) * 0.5).min(50.0);
            }
            if estimate_distance(load.destination(), return_location) < BACKHAUL_HOME_RADIUS_MILES {
                compatibility += 20.0;
            }

            (compatibility > BACKHAUL_MIN_COMPATIBILITY).then(|| BackhaulOpportunity {
                load: load.clone(),
                deadhead_to_pickup: deadhead,
                compatibility_score: compatibility,
                reasoning: format!(
                    "Backhaul reduces empty miles; {deadhead}mi deadhead to pickup"
                ),
            })
        })
        .collect();

    opportunities.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));
    opportunities.truncate(MAX_BACKHAULS);
    opportunities
}
