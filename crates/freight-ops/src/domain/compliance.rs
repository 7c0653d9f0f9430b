use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fuel bought in a single jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPurchase {
    pub timestamp: DateTime<Utc>,
    /// State or province code, e.g. `OK`.
    pub jurisdiction: String,
    pub gallons: Decimal,
    pub price_per_gallon: Decimal,
    pub total_cost: Decimal,
    #[serde(default)]
    pub location: String,
}

/// Miles driven inside a jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageRecord {
    pub date: DateTime<Utc>,
    pub jurisdiction: String,
    pub miles: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    Driving,
    OnDuty,
    OffDuty,
    Sleeper,
}

impl DutyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DutyStatus::Driving => "driving",
            DutyStatus::OnDuty => "on_duty",
            DutyStatus::OffDuty => "off_duty",
            DutyStatus::Sleeper => "sleeper",
        }
    }
}
