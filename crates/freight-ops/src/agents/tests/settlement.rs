use super::common::*;
use crate::agents::settlement::{SettlementAgent, SettlementRequest};
use crate::agents::{Agent, AgentOptions};
use crate::domain::{DriverContract, PayType};
use crate::metrics::PayStatus;
use rust_decimal_macros::dec;

fn contract() -> DriverContract {
    DriverContract {
        driver_id: "DRV-001".to_string(),
        driver_name: "Sam Ortiz".to_string(),
        pay_type: PayType::Percentage,
        pay_rate: dec!(0.70),
        fuel_card_provided: true,
        insurance_deduction: dec!(0),
        weekly_deductions: dec!(0),
    }
}

fn request() -> SettlementRequest {
    SettlementRequest {
        contract: contract(),
        loads: vec![load("LOAD-001", dec!(850), 300, 0)],
        advances: Vec::new(),
        expenses: Vec::new(),
        period_start: Some(at(3, 0)),
        period_end: Some(at(9, 23)),
    }
}

#[test]
fn percentage_contract_pays_share_of_gross() {
    let agent = SettlementAgent::new(&app_config(), &AgentOptions::offline())
        .expect("settlement agent builds");

    let statement = agent.calculate_settlement_at(&request(), at(10, 12));

    assert_eq!(statement.settlement_id, "SETTLE-DRV-001-20250310");
    assert_eq!(statement.loads.len(), 1);
    assert_eq!(statement.loads[0].driver_gross_pay, dec!(595));
    assert_eq!(statement.gross_earnings, dec!(595));
    assert_eq!(statement.net_pay, dec!(595));
    assert_eq!(statement.pay_status, PayStatus::OwedToDriver);
    assert_eq!(statement.period_start, at(3, 0));

    let decisions = agent.decisions().snapshot();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].decision_type, "settlement_calculation");
    assert_eq!(decisions[0].confidence, 1.0);
}

#[test]
fn missing_period_defaults_to_calculation_time() {
    let agent = SettlementAgent::new(&app_config(), &AgentOptions::offline())
        .expect("settlement agent builds");

    let mut request = request();
    request.period_start = None;
    request.period_end = None;
    let statement = agent.calculate_settlement_at(&request, at(10, 12));

    assert_eq!(statement.period_start, at(10, 12));
    assert_eq!(statement.period_end, at(10, 12));
}

#[tokio::test]
async fn execute_settles_through_the_agent_trait() {
    let agent = SettlementAgent::new(&app_config(), &AgentOptions::offline())
        .expect("settlement agent builds");
    let statement = agent.execute(request()).await;
    assert_eq!(statement.driver_id, "DRV-001");
    assert_eq!(agent.decisions().len(), 1);
}
