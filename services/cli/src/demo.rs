use crate::commands::{
    render_compliance, render_dispatch, render_hos, render_ifta, render_rates, render_route,
    render_settlement,
};
use crate::infra::Session;
use chrono::{DateTime, Duration, Utc};
use freight_ops::agents::compliance::{ComplianceRequest, HosCheck, IftaRequest};
use freight_ops::agents::dispatch::DispatchRequest;
use freight_ops::agents::route_optimizer::RouteRequest;
use freight_ops::agents::settlement::SettlementRequest;
use freight_ops::agents::{
    Agent, ComplianceAgent, DispatchAgent, RateAnalysisAgent, RouteOptimizerAgent,
    SettlementAgent,
};
use freight_ops::domain::{
    Advance, DriverContract, DutyStatus, Expense, ExpenseType, FuelPurchase, LaneQuery, Load,
    LoadDetails, Location, MileageRecord, PayType,
};
use freight_ops::error::AppError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) async fn run_demo(session: &Session) -> Result<(), AppError> {
    let now = Utc::now();
    println!("Freight operations demo");

    let dispatch = DispatchAgent::new(&session.config, &session.options)?;
    let result = dispatch
        .execute(DispatchRequest::new(demo_loads(now)?))
        .await;
    render_dispatch(&result);

    let rates = RateAnalysisAgent::new(&session.config, &session.options)?;
    let lane = rates
        .execute(LaneQuery {
            origin_city: "Tulsa".to_string(),
            origin_state: "OK".to_string(),
            destination_city: "Dallas".to_string(),
            destination_state: "TX".to_string(),
            distance_miles: 250,
            historical_rates: Vec::new(),
        })
        .await;
    render_rates(&lane);

    let compliance = ComplianceAgent::new(&session.config, &session.options)?;
    let check = HosCheck {
        driver_id: "DRV-001".to_string(),
        current_status: DutyStatus::Driving,
        drive_hours_today: dec!(9.5),
        on_duty_hours_today: dec!(11.0),
        last_break_time: Some(now - Duration::hours(7)),
        as_of: now,
    };
    render_hos(&compliance.check_hos_compliance(&check));
    render_compliance(&compliance.execute(ComplianceRequest::Hos(check)).await);
    render_ifta(&compliance.calculate_ifta_report(&demo_ifta_request(now)));

    let routes = RouteOptimizerAgent::new(&session.config, &session.options)?;
    let route = routes
        .execute(RouteRequest {
            origin: Location::new("Tulsa", "OK").with_coordinates(36.1540, -95.9928),
            destination: Location::new("Dallas", "TX").with_coordinates(32.7767, -96.7970),
            current_location: None,
            available_backhauls: Vec::new(),
        })
        .await;
    render_route(&route);

    let settlement = SettlementAgent::new(&session.config, &session.options)?;
    let statement = settlement.calculate_settlement(&demo_settlement_request(now)?);
    render_settlement(&statement);

    session.export_each(&[
        dispatch.runtime(),
        rates.runtime(),
        compliance.runtime(),
        routes.runtime(),
        settlement.runtime(),
    ])
}

fn demo_details(id: &str, origin: Location, destination: Location, now: DateTime<Utc>) -> LoadDetails {
    LoadDetails {
        load_id: id.to_string(),
        broker_name: Some("Test Broker".to_string()),
        origin,
        destination,
        pickup_date: now,
        delivery_date: now,
        commodity: "Auto Parts".to_string(),
        weight: 5000,
        rate: Decimal::ZERO,
        fuel_surcharge: Decimal::ZERO,
        additional_charges: Decimal::ZERO,
        loaded_miles: 0,
        deadhead_miles: 0,
        is_hazmat: false,
        is_team_required: false,
        is_expedited: false,
        requires_tarp: false,
        equipment_type: "Hotshot".to_string(),
    }
}

/// Tulsa to Dallas and a longer Oklahoma City to Houston run.
fn demo_loads(now: DateTime<Utc>) -> Result<Vec<Load>, AppError> {
    let short_haul = LoadDetails {
        rate: dec!(600),
        loaded_miles: 250,
        deadhead_miles: 20,
        ..demo_details(
            "LOAD-001",
            Location::new("Tulsa", "OK"),
            Location::new("Dallas", "TX"),
            now,
        )
    };
    let long_haul = LoadDetails {
        broker_name: Some("Test Broker 2".to_string()),
        commodity: "Machinery".to_string(),
        weight: 8000,
        rate: dec!(900),
        loaded_miles: 450,
        deadhead_miles: 100,
        ..demo_details(
            "LOAD-002",
            Location::new("Oklahoma City", "OK"),
            Location::new("Houston", "TX"),
            now,
        )
    };
    Ok(vec![Load::new(short_haul)?, Load::new(long_haul)?])
}

fn demo_ifta_request(now: DateTime<Utc>) -> IftaRequest {
    let fuel = |jurisdiction: &str, gallons: Decimal, price: Decimal, total: Decimal, at: &str| {
        FuelPurchase {
            timestamp: now,
            jurisdiction: jurisdiction.to_string(),
            gallons,
            price_per_gallon: price,
            total_cost: total,
            location: at.to_string(),
        }
    };
    let miles = |jurisdiction: &str, miles: u32| MileageRecord {
        date: now,
        jurisdiction: jurisdiction.to_string(),
        miles,
        load_id: None,
    };

    IftaRequest {
        quarter: "Q1".to_string(),
        year: 2024,
        mileage_records: vec![miles("OK", 450), miles("TX", 350), miles("AR", 200)],
        fuel_purchases: vec![
            fuel("OK", dec!(25.5), dec!(3.45), dec!(87.98), "Tulsa, OK"),
            fuel("TX", dec!(28.0), dec!(3.60), dec!(100.80), "Dallas, TX"),
        ],
    }
}

fn demo_settlement_request(now: DateTime<Utc>) -> Result<SettlementRequest, AppError> {
    let contract = DriverContract {
        driver_id: "DRV-001".to_string(),
        driver_name: "John Smith".to_string(),
        pay_type: PayType::Percentage,
        pay_rate: dec!(0.70),
        fuel_card_provided: false,
        insurance_deduction: dec!(250.00),
        weekly_deductions: Decimal::ZERO,
    };

    let first = LoadDetails {
        rate: dec!(800),
        fuel_surcharge: dec!(50),
        loaded_miles: 250,
        deadhead_miles: 20,
        ..demo_details(
            "LOAD-001",
            Location::new("Tulsa", "OK"),
            Location::new("Dallas", "TX"),
            now,
        )
    };
    let second = LoadDetails {
        broker_name: Some("Test Broker 2".to_string()),
        commodity: "Machinery".to_string(),
        weight: 8000,
        rate: dec!(600),
        fuel_surcharge: dec!(40),
        loaded_miles: 240,
        deadhead_miles: 15,
        ..demo_details(
            "LOAD-002",
            Location::new("Dallas", "TX"),
            Location::new("Houston", "TX"),
            now,
        )
    };
    let loads = vec![Load::new(first)?, Load::new(second)?];

    Ok(SettlementRequest {
        contract,
        loads,
        advances: vec![Advance {
            advance_id: "ADV-001".to_string(),
            driver_id: "DRV-001".to_string(),
            amount: dec!(200.00),
            date: now,
            reason: "Fuel advance".to_string(),
        }],
        expenses: vec![
            Expense {
                expense_id: "EXP-001".to_string(),
                driver_id: "DRV-001".to_string(),
                expense_type: ExpenseType::Tolls,
                amount: dec!(35.00),
                date: now,
                description: "Toll roads".to_string(),
                reimbursable: true,
            },
            Expense {
                expense_id: "EXP-002".to_string(),
                driver_id: "DRV-001".to_string(),
                expense_type: ExpenseType::Fuel,
                amount: dec!(150.00),
                date: now,
                description: "Fuel purchase".to_string(),
                reimbursable: false,
            },
        ],
        period_start: None,
        period_end: None,
    })
}
