use crate::domain::Load;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Truck economics needed to cost a trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostProfile {
    pub truck_mpg: Decimal,
    pub fuel_price_per_gallon: Decimal,
    pub cost_per_mile: Decimal,
}

/// Deterministic profitability figures for a single load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMetrics {
    pub rate_per_loaded_mile: Decimal,
    pub rate_per_all_miles: Decimal,
    pub deadhead_percentage: Decimal,
    pub gross_revenue: Decimal,
    pub fuel_cost: Decimal,
    pub fuel_gallons: Decimal,
    pub operating_cost: Decimal,
    pub net_profit: Decimal,
    pub profit_margin_pct: Decimal,
    pub total_miles: u32,
    pub loaded_miles: u32,
    pub deadhead_miles: u32,
}

pub fn load_metrics(load: &Load, costs: &CostProfile) -> LoadMetrics {
    let total_miles = Decimal::from(load.total_miles());

    let fuel_gallons = if costs.truck_mpg.is_zero() {
        Decimal::ZERO
    } else {
        total_miles / costs.truck_mpg
    };
    let fuel_cost = fuel_gallons * costs.fuel_price_per_gallon;
    let operating_cost = total_miles * costs.cost_per_mile;

    let gross_revenue = load.gross_revenue();
    let net_profit = gross_revenue - operating_cost - fuel_cost;
    let profit_margin_pct = if gross_revenue > Decimal::ZERO {
        net_profit / gross_revenue * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    LoadMetrics {
        rate_per_loaded_mile: load.rate_per_mile(),
        rate_per_all_miles: load.all_miles_rate(),
        deadhead_percentage: load.deadhead_percentage(),
        gross_revenue,
        fuel_cost,
        fuel_gallons,
        operating_cost,
        net_profit,
        profit_margin_pct,
        total_miles: load.total_miles(),
        loaded_miles: load.loaded_miles(),
        deadhead_miles: load.deadhead_miles(),
    }
}
