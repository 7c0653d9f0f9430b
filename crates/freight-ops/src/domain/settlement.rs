use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a driver's gross pay is derived from a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// `pay_rate` is a fraction of gross revenue (0.70 = 70%).
    Percentage,
    /// `pay_rate` is dollars per loaded mile.
    PerMile,
}

/// Owner-operator or company driver pay terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverContract {
    pub driver_id: String,
    pub driver_name: String,
    pub pay_type: PayType,
    pub pay_rate: Decimal,
    #[serde(default)]
    pub fuel_card_provided: bool,
    #[serde(default)]
    pub insurance_deduction: Decimal,
    #[serde(default)]
    pub weekly_deductions: Decimal,
}

/// Cash advance given to a driver during the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    pub advance_id: String,
    pub driver_id: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Fuel,
    Tolls,
    Maintenance,
    Other,
}

/// Driver expense; reimbursable ones are paid back, the rest are deducted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: String,
    pub driver_id: String,
    pub expense_type: ExpenseType,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(default = "default_reimbursable")]
    pub reimbursable: bool,
}

fn default_reimbursable() -> bool {
    true
}
