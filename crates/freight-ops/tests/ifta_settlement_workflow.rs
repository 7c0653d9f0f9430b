use chrono::{TimeZone, Utc};
use freight_ops::agents::compliance::{ComplianceAgent, IftaRequest};
use freight_ops::agents::settlement::{SettlementAgent, SettlementRequest};
use freight_ops::agents::AgentOptions;
use freight_ops::config::{
    AgentModelConfig, AppConfig, BusinessConfig, Credentials, LlmConfig, ModelConfig, Provider,
};
use freight_ops::domain::{
    Advance, DriverContract, Expense, ExpenseType, Load, LoadDetails, Location, PayType,
};
use freight_ops::imports;
use freight_ops::metrics::PayStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn config() -> AppConfig {
    let mut llm = LlmConfig::default();
    for agent in ["compliance", "settlement"] {
        llm.agent_assignments.insert(
            agent.to_string(),
            AgentModelConfig {
                primary_model: ModelConfig {
                    provider: Provider::OpenAi,
                    model: "gpt-4o-mini".to_string(),
                    temperature: None,
                    max_tokens: None,
                    timeout_seconds: 30,
                    base_url: None,
                },
                fallback_model: None,
                system_prompt_template: String::new(),
            },
        );
    }
    AppConfig::from_parts(BusinessConfig::default(), llm, Credentials::default())
}

const MILEAGE: &str = "\
Date,Jurisdiction,Miles,Load ID
2024-01-08,OK,600,LOAD-001
2024-01-08,TX,300,LOAD-001
";

const FUEL: &str = "\
Date,Jurisdiction,Gallons,Price Per Gallon,Total Cost,Location
2024-01-08,OK,100,3.40,340.00,Tulsa
";

#[test]
fn csv_exports_feed_the_quarterly_report() {
    let agent = ComplianceAgent::new(&config(), &AgentOptions::default())
        .expect("compliance builds without API keys");

    let report = agent.calculate_ifta_report(&IftaRequest {
        quarter: "Q1".to_string(),
        year: 2024,
        mileage_records: imports::mileage_from_reader(MILEAGE.as_bytes()).expect("mileage"),
        fuel_purchases: imports::fuel_from_reader(FUEL.as_bytes()).expect("fuel"),
    });

    assert_eq!(report.quarter, "Q1 2024");
    assert_eq!(report.total_miles, 900);
    assert_eq!(report.fleet_mpg, dec!(9));

    let ok = &report.jurisdiction_data["OK"];
    let tx = &report.jurisdiction_data["TX"];
    assert_eq!(ok.taxable_gallons, dec!(600) / dec!(9));
    assert_eq!(tx.tax_owed, dec!(300) / dec!(9) * dec!(0.20));

    let summed: Decimal = report
        .jurisdiction_data
        .values()
        .map(|summary| summary.tax_owed)
        .sum();
    assert_eq!(report.total_tax_owed, summed);
    assert_eq!(report.net_tax_due, report.total_tax_owed);
}

#[test]
fn weekly_settlement_nets_advances_and_expenses() {
    let agent = SettlementAgent::new(&config(), &AgentOptions::default())
        .expect("settlement builds without API keys");
    let monday = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).single().expect("valid");

    let trip = |id: &str, rate: Decimal, miles: u32| {
        Load::new(LoadDetails {
            load_id: id.to_string(),
            broker_name: None,
            origin: Location::new("Tulsa", "OK"),
            destination: Location::new("Wichita", "KS"),
            pickup_date: monday,
            delivery_date: monday,
            commodity: "Hay".to_string(),
            weight: 9_000,
            rate,
            fuel_surcharge: dec!(40),
            additional_charges: Decimal::ZERO,
            loaded_miles: miles,
            deadhead_miles: 0,
            is_hazmat: false,
            is_team_required: false,
            is_expedited: false,
            requires_tarp: false,
            equipment_type: "Hotshot".to_string(),
        })
        .expect("valid load")
    };

    let request = SettlementRequest {
        contract: DriverContract {
            driver_id: "DRV-007".to_string(),
            driver_name: "Jo Reyes".to_string(),
            pay_type: PayType::Percentage,
            pay_rate: dec!(0.70),
            fuel_card_provided: false,
            insurance_deduction: dec!(50),
            weekly_deductions: dec!(25),
        },
        loads: vec![trip("LOAD-101", dec!(810), 180), trip("LOAD-102", dec!(460), 120)],
        advances: vec![Advance {
            advance_id: "ADV-1".to_string(),
            driver_id: "DRV-007".to_string(),
            amount: dec!(200),
            date: monday,
            reason: "Fuel".to_string(),
        }],
        expenses: vec![
            Expense {
                expense_id: "EXP-1".to_string(),
                driver_id: "DRV-007".to_string(),
                expense_type: ExpenseType::Tolls,
                amount: dec!(30),
                date: monday,
                description: "Turnpike".to_string(),
                reimbursable: true,
            },
            Expense {
                expense_id: "EXP-2".to_string(),
                driver_id: "DRV-007".to_string(),
                expense_type: ExpenseType::Other,
                amount: dec!(15),
                date: monday,
                description: "Phone".to_string(),
                reimbursable: false,
            },
        ],
        period_start: Some(monday),
        period_end: Some(monday + chrono::Duration::days(6)),
    };

    let statement = agent.calculate_settlement_at(&request, monday + chrono::Duration::days(7));

    // 70% of (850 + 500) plus two $40 surcharges
    assert_eq!(statement.gross_earnings, dec!(1025));
    assert_eq!(statement.total_miles, 300);
    assert_eq!(statement.total_deductions, dec!(290));
    assert_eq!(statement.total_reimbursements, dec!(30));
    assert_eq!(statement.net_pay, dec!(765));
    assert_eq!(statement.pay_status, PayStatus::OwedToDriver);
    assert_eq!(statement.settlement_id, "SETTLE-DRV-007-20250310");
    assert!(statement
        .notes
        .iter()
        .any(|note| note == "Amount owed to driver: $765.00"));
}
