use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic point used for pickups, deliveries and the home base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            zip_code: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// Unvalidated load description as it arrives from a load board or input file.
///
/// Convert into a [`Load`] with [`Load::new`]; the conversion enforces the
/// positivity constraints on weight, distance and rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDetails {
    pub load_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_name: Option<String>,
    pub origin: Location,
    pub destination: Location,
    pub pickup_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub commodity: String,
    /// Weight in pounds.
    pub weight: u32,
    pub rate: Decimal,
    #[serde(default)]
    pub fuel_surcharge: Decimal,
    #[serde(default)]
    pub additional_charges: Decimal,
    pub loaded_miles: u32,
    #[serde(default)]
    pub deadhead_miles: u32,
    #[serde(default)]
    pub is_hazmat: bool,
    #[serde(default)]
    pub is_team_required: bool,
    #[serde(default)]
    pub is_expedited: bool,
    #[serde(default)]
    pub requires_tarp: bool,
    #[serde(default = "default_equipment_type")]
    pub equipment_type: String,
}

fn default_equipment_type() -> String {
    "Hotshot".to_string()
}

/// Reasons a load description is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("load {load_id}: weight must be greater than zero")]
    NonPositiveWeight { load_id: String },
    #[error("load {load_id}: loaded miles must be greater than zero")]
    NonPositiveLoadedMiles { load_id: String },
    #[error("load {load_id}: rate must be greater than zero (found {rate})")]
    NonPositiveRate { load_id: String, rate: Decimal },
    #[error("load {load_id}: {field} cannot be negative (found {value})")]
    NegativeCharge {
        load_id: String,
        field: &'static str,
        value: Decimal,
    },
    #[error("load identifier cannot be empty")]
    MissingIdentifier,
}

/// A validated freight shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoadDetails", into = "LoadDetails")]
pub struct Load {
    details: LoadDetails,
}

impl Load {
    pub fn new(details: LoadDetails) -> Result<Self, LoadError> {
        if details.load_id.trim().is_empty() {
            return Err(LoadError::MissingIdentifier);
        }
        if details.weight == 0 {
            return Err(LoadError::NonPositiveWeight {
                load_id: details.load_id,
            });
        }
        if details.loaded_miles == 0 {
            return Err(LoadError::NonPositiveLoadedMiles {
                load_id: details.load_id,
            });
        }
        if details.rate <= Decimal::ZERO {
            return Err(LoadError::NonPositiveRate {
                rate: details.rate,
                load_id: details.load_id,
            });
        }
        for (field, value) in [
            ("fuel surcharge", details.fuel_surcharge),
            ("additional charges", details.additional_charges),
        ] {
            if value < Decimal::ZERO {
                return Err(LoadError::NegativeCharge {
                    load_id: details.load_id,
                    field,
                    value,
                });
            }
        }

        Ok(Self { details })
    }

    pub fn details(&self) -> &LoadDetails {
        &self.details
    }

    pub fn load_id(&self) -> &str {
        &self.details.load_id
    }

    pub fn origin(&self) -> &Location {
        &self.details.origin
    }

    pub fn destination(&self) -> &Location {
        &self.details.destination
    }

    pub fn weight(&self) -> u32 {
        self.details.weight
    }

    pub fn loaded_miles(&self) -> u32 {
        self.details.loaded_miles
    }

    pub fn deadhead_miles(&self) -> u32 {
        self.details.deadhead_miles
    }

    pub fn fuel_surcharge(&self) -> Decimal {
        self.details.fuel_surcharge
    }

    pub fn is_hazmat(&self) -> bool {
        self.details.is_hazmat
    }

    pub fn is_team_required(&self) -> bool {
        self.details.is_team_required
    }

    pub fn is_expedited(&self) -> bool {
        self.details.is_expedited
    }

    pub fn requires_tarp(&self) -> bool {
        self.details.requires_tarp
    }

    /// Saturates at `u32::MAX`.
    pub fn total_miles(&self) -> u32 {
        self.details
            .loaded_miles
            .saturating_add(self.details.deadhead_miles)
    }

    /// Empty miles as a share of all miles, 0 when the trip has no distance.
    pub fn deadhead_percentage(&self) -> Decimal {
        let total = self.total_miles();
        if total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.details.deadhead_miles) / Decimal::from(total) * Decimal::ONE_HUNDRED
    }

    pub fn gross_revenue(&self) -> Decimal {
        self.details.rate + self.details.fuel_surcharge + self.details.additional_charges
    }

    /// Gross revenue per loaded mile.
    pub fn rate_per_mile(&self) -> Decimal {
        if self.details.loaded_miles == 0 {
            return Decimal::ZERO;
        }
        self.gross_revenue() / Decimal::from(self.details.loaded_miles)
    }

    /// Gross revenue per mile including deadhead.
    pub fn all_miles_rate(&self) -> Decimal {
        let total = self.total_miles();
        if total == 0 {
            return Decimal::ZERO;
        }
        self.gross_revenue() / Decimal::from(total)
    }

    pub fn trip_duration_hours(&self) -> f64 {
        let delta = self.details.delivery_date - self.details.pickup_date;
        delta.num_seconds() as f64 / 3600.0
    }

    pub fn is_profitable(&self, min_rpm: Decimal, max_deadhead_pct: Decimal) -> bool {
        self.rate_per_mile() >= min_rpm && self.deadhead_percentage() <= max_deadhead_pct
    }
}

impl TryFrom<LoadDetails> for Load {
    type Error = LoadError;

    fn try_from(value: LoadDetails) -> Result<Self, Self::Error> {
        Load::new(value)
    }
}

impl From<Load> for LoadDetails {
    fn from(value: Load) -> Self {
        value.details
    }
}
