use crate::domain::{Advance, DriverContract, Expense, Load, PayType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Driver pay derived from one completed load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSettlement {
    pub load_id: String,
    pub gross_revenue: Decimal,
    pub driver_gross_pay: Decimal,
    pub calculation_method: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayStatus {
    OwedToDriver,
    DriverOwes,
    Settled,
}

impl PayStatus {
    fn from_net_pay(net_pay: Decimal) -> Self {
        if net_pay > Decimal::ZERO {
            PayStatus::OwedToDriver
        } else if net_pay < Decimal::ZERO {
            PayStatus::DriverOwes
        } else {
            PayStatus::Settled
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayStatus::OwedToDriver => "owed_to_driver",
            PayStatus::DriverOwes => "driver_owes",
            PayStatus::Settled => "settled",
        }
    }
}

/// Full pay statement for a driver and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub settlement_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,

    pub loads: Vec<LoadSettlement>,
    pub total_loads: usize,
    /// Loaded miles only; deadhead is not paid.
    pub total_miles: u32,
    pub gross_earnings: Decimal,

    pub advances: Vec<Advance>,
    pub total_advances: Decimal,
    pub expenses: Vec<Expense>,
    pub total_expenses: Decimal,
    pub insurance_deduction: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,

    pub reimbursements: Vec<Expense>,
    pub total_reimbursements: Decimal,

    pub net_pay: Decimal,
    pub pay_status: PayStatus,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Settlement period and clock used to stamp the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

impl SettlementPeriod {
    pub fn settlement_id(&self, driver_id: &str) -> String {
        format!("SETTLE-{}-{}", driver_id, self.generated_at.format("%Y%m%d"))
    }
}

pub fn settle_load(load: &Load, contract: &DriverContract) -> LoadSettlement {
    let gross_revenue = load.gross_revenue();

    let (mut driver_pay, calculation_method) = match contract.pay_type {
        PayType::Percentage => (
            gross_revenue * contract.pay_rate,
            format!(
                "{}% of gross revenue",
                percent_label(contract.pay_rate)
            ),
        ),
        PayType::PerMile => (
            Decimal::from(load.loaded_miles()) * contract.pay_rate,
            format!(
                "${}/mile × {} miles",
                contract.pay_rate,
                load.loaded_miles()
            ),
        ),
    };

    let notes = if contract.fuel_card_provided {
        "Fuel surcharge retained (fuel card provided)"
    } else {
        driver_pay += load.fuel_surcharge();
        "Fuel surcharge included in pay"
    };

    LoadSettlement {
        load_id: load.load_id().to_string(),
        gross_revenue,
        driver_gross_pay: driver_pay,
        calculation_method,
        notes: notes.to_string(),
    }
}

/// Net pay: gross earnings minus advances, non-reimbursable expenses and
/// contract deductions, plus reimbursable expenses.
pub fn settle(
    contract: &DriverContract,
    loads: &[Load],
    advances: &[Advance],
    expenses: &[Expense],
    period: SettlementPeriod,
) -> Settlement {
    let load_settlements: Vec<LoadSettlement> = loads
        .iter()
        .map(|load| settle_load(load, contract))
        .collect();
    let gross_earnings: Decimal = load_settlements
        .iter()
        .map(|line| line.driver_gross_pay)
        .sum();
    let total_miles = loads
        .iter()
        .fold(0u32, |total, load| total.saturating_add(load.loaded_miles()));

    let total_advances: Decimal = advances.iter().map(|advance| advance.amount).sum();

    let (reimbursements, deductible): (Vec<Expense>, Vec<Expense>) = expenses
        .iter()
        .cloned()
        .partition(|expense| expense.reimbursable);
    let total_expenses: Decimal = deductible.iter().map(|expense| expense.amount).sum();
    let total_reimbursements: Decimal = reimbursements.iter().map(|expense| expense.amount).sum();

    let insurance_deduction = contract.insurance_deduction;
    let other_deductions = contract.weekly_deductions;
    let total_deductions = total_advances + total_expenses + insurance_deduction + other_deductions;

    let net_pay = gross_earnings - total_deductions + total_reimbursements;
    let pay_status = PayStatus::from_net_pay(net_pay);

    Settlement {
        settlement_id: period.settlement_id(&contract.driver_id),
        driver_id: contract.driver_id.clone(),
        driver_name: contract.driver_name.clone(),
        period_start: period.start,
        period_end: period.end,
        total_loads: load_settlements.len(),
        loads: load_settlements,
        total_miles,
        gross_earnings,
        advances: advances.to_vec(),
        total_advances,
        expenses: deductible,
        total_expenses,
        insurance_deduction,
        other_deductions,
        total_deductions,
        reimbursements,
        total_reimbursements,
        net_pay,
        pay_status,
        generated_at: period.generated_at,
        notes: settlement_notes(contract, gross_earnings, total_deductions, net_pay),
    }
}

fn percent_label(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).round_dp(0).normalize()
}

fn settlement_notes(
    contract: &DriverContract,
    gross_earnings: Decimal,
    total_deductions: Decimal,
    net_pay: Decimal,
) -> Vec<String> {
    let mut notes = Vec::new();

    match contract.pay_type {
        PayType::Percentage => notes.push(format!(
            "Pay rate: {}% of gross revenue",
            percent_label(contract.pay_rate)
        )),
        PayType::PerMile => notes.push(format!("Pay rate: ${}/mile", contract.pay_rate)),
    }

    notes.push(format!("Gross earnings: ${:.2}", gross_earnings));

    if total_deductions > Decimal::ZERO {
        notes.push(format!("Total deductions: ${:.2}", total_deductions));
    }

    match PayStatus::from_net_pay(net_pay) {
        PayStatus::OwedToDriver => notes.push(format!("Amount owed to driver: ${:.2}", net_pay)),
        PayStatus::DriverOwes => notes.push(format!("Driver owes company: ${:.2}", net_pay.abs())),
        PayStatus::Settled => notes.push("Settlement is balanced".to_string()),
    }

    if contract.fuel_card_provided {
        notes.push("Fuel card provided - fuel surcharges not included in pay".to_string());
    }

    notes
}
