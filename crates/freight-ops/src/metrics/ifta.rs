use crate::domain::{FuelPurchase, MileageRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_FUEL_TAX_RATE: Decimal = dec!(0.20);

/// Per-gallon fuel tax by jurisdiction.
///
/// Fixed table with a flat default for unlisted jurisdictions; not a live
/// regulatory rate feed.
pub fn fuel_tax_rate(jurisdiction: &str) -> Decimal {
    match jurisdiction {
        "OK" => dec!(0.20),
        "TX" => dec!(0.20),
        "AR" => dec!(0.245),
        "KS" => dec!(0.26),
        "MO" => dec!(0.195),
        "LA" => dec!(0.20),
        _ => DEFAULT_FUEL_TAX_RATE,
    }
}

/// Aggregated activity and apportioned tax for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    pub miles: u32,
    pub gallons: Decimal,
    pub fuel_cost: Decimal,
    pub taxable_gallons: Decimal,
    pub tax_rate: Decimal,
    pub tax_owed: Decimal,
}

/// Totals for a reporting period, before quarter/home metadata is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IftaApportionment {
    pub jurisdictions: BTreeMap<String, JurisdictionSummary>,
    pub total_miles: u32,
    pub total_gallons: Decimal,
    /// Fleet miles per gallon across all purchases; 0 without purchases.
    pub fleet_mpg: Decimal,
    pub total_tax_owed: Decimal,
    /// Negative values are a refund position.
    pub net_tax_due: Decimal,
}

pub fn apportion(
    mileage_records: &[MileageRecord],
    fuel_purchases: &[FuelPurchase],
) -> IftaApportionment {
    let mut jurisdictions: BTreeMap<String, JurisdictionSummary> = BTreeMap::new();

    for record in mileage_records {
        let summary = jurisdictions.entry(record.jurisdiction.clone()).or_default();
        summary.miles = summary.miles.saturating_add(record.miles);
    }

    for purchase in fuel_purchases {
        let summary = jurisdictions.entry(purchase.jurisdiction.clone()).or_default();
        summary.gallons += purchase.gallons;
        summary.fuel_cost += purchase.total_cost;
    }

    let total_miles = jurisdictions
        .values()
        .fold(0u32, |total, summary| total.saturating_add(summary.miles));
    let total_gallons: Decimal = jurisdictions.values().map(|summary| summary.gallons).sum();

    let fleet_mpg = if total_gallons > Decimal::ZERO {
        Decimal::from(total_miles) / total_gallons
    } else {
        Decimal::ZERO
    };

    let mut total_tax_owed = Decimal::ZERO;
    if total_miles > 0 {
        for (jurisdiction, summary) in jurisdictions.iter_mut() {
            summary.taxable_gallons = if fleet_mpg > Decimal::ZERO {
                Decimal::from(summary.miles) / fleet_mpg
            } else {
                Decimal::ZERO
            };
            summary.tax_rate = fuel_tax_rate(jurisdiction);
            summary.tax_owed = (summary.taxable_gallons - summary.gallons) * summary.tax_rate;
            total_tax_owed += summary.tax_owed;
        }
    }

    IftaApportionment {
        jurisdictions,
        total_miles,
        total_gallons,
        fleet_mpg,
        total_tax_owed,
        net_tax_due: total_tax_owed,
    }
}
