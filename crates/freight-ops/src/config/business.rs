use crate::domain::Location;
use crate::metrics::profitability::CostProfile;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Business rules and operating assumptions read from `config.yaml`.
///
/// Every section falls back to the documented defaults when omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    pub company: CompanyInfo,
    pub rates: RateThresholds,
    pub costs: OperatingCosts,
    pub equipment: EquipmentConfig,
    pub ifta: IftaSettings,
    pub home_base: HomeBase,
}

impl BusinessConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(raw)
    }

    pub fn cost_profile(&self) -> CostProfile {
        CostProfile {
            truck_mpg: self.equipment.truck.mpg,
            fuel_price_per_gallon: self.costs.fuel_cost_per_gallon,
            cost_per_mile: self.costs.cost_per_mile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub dot_number: Option<String>,
    pub mc_number: Option<String>,
}

/// Rate-per-mile bands and the deadhead ceiling used to judge loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateThresholds {
    pub minimum_rate_per_mile: Decimal,
    pub target_rate_per_mile: Decimal,
    pub premium_rate_per_mile: Decimal,
    pub max_deadhead_percentage: Decimal,
}

impl Default for RateThresholds {
    fn default() -> Self {
        Self {
            minimum_rate_per_mile: dec!(2.0),
            target_rate_per_mile: dec!(2.5),
            premium_rate_per_mile: dec!(3.0),
            max_deadhead_percentage: dec!(20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingCosts {
    pub cost_per_mile: Decimal,
    pub fuel_cost_per_gallon: Decimal,
}

impl Default for OperatingCosts {
    fn default() -> Self {
        Self {
            cost_per_mile: dec!(0.39),
            fuel_cost_per_gallon: dec!(3.50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    pub truck: TruckSpec,
    pub trailer: TrailerSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckSpec {
    pub mpg: Decimal,
}

impl Default for TruckSpec {
    fn default() -> Self {
        Self { mpg: dec!(9) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerSpec {
    pub max_weight_lbs: u32,
}

impl Default for TrailerSpec {
    fn default() -> Self {
        Self {
            max_weight_lbs: 16_500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IftaSettings {
    pub home_state: String,
}

impl Default for IftaSettings {
    fn default() -> Self {
        Self {
            home_state: "OK".to_string(),
        }
    }
}

/// Where trucks return between loads; drives backhaul matching.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeBase {
    pub city: String,
    pub state: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl HomeBase {
    pub fn location(&self) -> Location {
        let location = Location::new(self.city.clone(), self.state.clone());
        match self.coordinates {
            Some(coords) => location.with_coordinates(coords.latitude, coords.longitude),
            None => location,
        }
    }
}
