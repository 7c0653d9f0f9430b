use super::common::*;
use crate::agents::compliance::{
    ComplianceAgent, ComplianceRequest, ComplianceStatus, ComplianceType, HosCheck, IftaRequest,
};
use crate::agents::{Agent, AgentOptions};
use crate::domain::{DutyStatus, FuelPurchase, MileageRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn agent() -> ComplianceAgent {
    ComplianceAgent::new(&app_config(), &AgentOptions::offline()).expect("compliance agent builds")
}

fn hos_check(drive: Decimal, on_duty: Decimal) -> HosCheck {
    HosCheck {
        driver_id: "DRV-001".to_string(),
        current_status: DutyStatus::Driving,
        drive_hours_today: drive,
        on_duty_hours_today: on_duty,
        last_break_time: None,
        as_of: at(4, 18),
    }
}

fn miles(jurisdiction: &str, miles: u32) -> MileageRecord {
    MileageRecord {
        date: at(5, 0),
        jurisdiction: jurisdiction.to_string(),
        miles,
        load_id: None,
    }
}

fn fuel(jurisdiction: &str, gallons: Decimal) -> FuelPurchase {
    FuelPurchase {
        timestamp: at(5, 9),
        jurisdiction: jurisdiction.to_string(),
        gallons,
        price_per_gallon: dec!(3.50),
        total_cost: gallons * dec!(3.50),
        location: String::new(),
    }
}

#[test]
fn ifta_report_labels_quarter_and_totals() {
    let agent = agent();
    let report = agent.calculate_ifta_report(&IftaRequest {
        quarter: "Q1".to_string(),
        year: 2024,
        mileage_records: vec![miles("OK", 600), miles("TX", 300)],
        fuel_purchases: vec![fuel("OK", dec!(100))],
    });

    assert_eq!(report.quarter, "Q1 2024");
    assert_eq!(report.year, 2024);
    assert_eq!(report.home_jurisdiction, "OK");
    assert_eq!(report.total_miles, 900);
    assert_eq!(report.total_gallons, dec!(100));
    assert_eq!(report.fleet_mpg, dec!(9));
    assert_eq!(
        report.jurisdiction_data.keys().collect::<Vec<_>>(),
        vec!["OK", "TX"]
    );

    let decisions = agent.decisions().snapshot();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].decision_type, "ifta_calculation");
    assert_eq!(decisions[0].tools_used, vec!["ifta_calculator", "tax_rate_lookup"]);
}

#[test]
fn hos_status_reports_remaining_hours() {
    let status = agent().check_hos_compliance(&hos_check(dec!(6), dec!(8)));
    assert_eq!(status.hours_available_to_drive, dec!(5));
    assert_eq!(status.hours_available_on_duty, dec!(6));
    assert!(status.violations.is_empty());
    assert!(status.warnings.is_empty());
}

#[test]
fn break_age_is_measured_from_check_time() {
    let mut check = hos_check(dec!(5), dec!(6));
    check.last_break_time = Some(at(4, 9));

    let status = agent().check_hos_compliance(&check);
    assert_eq!(status.hours_until_required_break, Decimal::ZERO);
    assert_eq!(
        status.violations,
        vec!["Required 30-minute break after 8.0h not taken"]
    );
}

#[tokio::test]
async fn execute_maps_hos_findings_to_status() {
    let agent = agent();

    let violation = agent
        .execute(ComplianceRequest::Hos(hos_check(dec!(11.5), dec!(12))))
        .await;
    assert_eq!(violation.compliance_type, ComplianceType::Hos);
    assert_eq!(violation.status, ComplianceStatus::Violation);
    assert_eq!(violation.findings, vec!["Maximum driving hours (11.0h) exceeded"]);
    assert_eq!(violation.recommendations.len(), 2);

    let warning = agent
        .execute(ComplianceRequest::Hos(hos_check(dec!(10), dec!(11))))
        .await;
    assert_eq!(warning.status, ComplianceStatus::Warning);
    assert_eq!(
        warning.findings,
        vec!["Approaching maximum driving hours (1.0h remaining)"]
    );

    let compliant = agent
        .execute(ComplianceRequest::Hos(hos_check(dec!(5), dec!(6))))
        .await;
    assert_eq!(compliant.status, ComplianceStatus::Compliant);
    assert_eq!(compliant.findings, vec!["All HOS requirements met"]);
    assert!(compliant.recommendations.is_empty());
}

#[tokio::test]
async fn execute_ifta_is_a_tracking_reminder() {
    let result = agent().execute(ComplianceRequest::Ifta).await;
    assert_eq!(result.compliance_type, ComplianceType::Ifta);
    assert_eq!(result.status, ComplianceStatus::Compliant);
    assert_eq!(result.findings, vec!["IFTA tracking active"]);
}
