use crate::infra::{banner, bullet_list, closing_rule, parse_duty_status, read_json, Session};
use chrono::{DateTime, Utc};
use clap::Args;
use freight_ops::agents::compliance::{
    ComplianceRequest, ComplianceResult, HosCheck, HosStatus, IftaReport, IftaRequest,
};
use freight_ops::agents::dispatch::{DispatchRequest, DispatchResult};
use freight_ops::agents::rate_analysis::RateAnalysisResult;
use freight_ops::agents::route_optimizer::{RouteOptimizationResult, RouteRequest};
use freight_ops::agents::settlement::SettlementRequest;
use freight_ops::agents::{
    Agent, ComplianceAgent, DispatchAgent, RateAnalysisAgent, RouteOptimizerAgent,
    SettlementAgent,
};
use freight_ops::domain::{DutyStatus, LaneQuery, LaneRate, Load};
use freight_ops::error::AppError;
use freight_ops::imports;
use freight_ops::metrics::Settlement;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DispatchArgs {
    /// JSON array of loads
    #[arg(long, value_name = "PATH")]
    pub(crate) loads: PathBuf,
    /// Number of recommendations to keep
    #[arg(long, default_value_t = 5)]
    pub(crate) max: usize,
}

#[derive(Args, Debug)]
pub(crate) struct RatesArgs {
    #[arg(long)]
    pub(crate) origin_city: String,
    #[arg(long)]
    pub(crate) origin_state: String,
    #[arg(long)]
    pub(crate) destination_city: String,
    #[arg(long)]
    pub(crate) destination_state: String,
    /// Lane distance in miles
    #[arg(long)]
    pub(crate) distance: u32,
    /// Optional JSON array of observed lane rates
    #[arg(long, value_name = "PATH")]
    pub(crate) history: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct HosArgs {
    #[arg(long)]
    pub(crate) driver_id: String,
    /// driving, on_duty, off_duty or sleeper
    #[arg(long, default_value = "driving", value_parser = parse_duty_status)]
    pub(crate) status: DutyStatus,
    #[arg(long)]
    pub(crate) drive_hours: Decimal,
    #[arg(long)]
    pub(crate) on_duty_hours: Decimal,
    /// Start of the last 30-minute break (RFC 3339)
    #[arg(long)]
    pub(crate) last_break: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct IftaArgs {
    /// Quarter label, e.g. Q1
    #[arg(long)]
    pub(crate) quarter: String,
    #[arg(long)]
    pub(crate) year: i32,
    /// CSV with Date,Jurisdiction,Miles,Load ID
    #[arg(long, value_name = "PATH")]
    pub(crate) mileage_csv: PathBuf,
    /// CSV with Date,Jurisdiction,Gallons,Price Per Gallon,Total Cost,Location
    #[arg(long, value_name = "PATH")]
    pub(crate) fuel_csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SettleArgs {
    /// JSON settlement request: contract, loads, advances, expenses
    #[arg(long, value_name = "PATH")]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RouteArgs {
    /// JSON route request: origin, destination, optional backhaul loads
    #[arg(long, value_name = "PATH")]
    pub(crate) input: PathBuf,
}

pub(crate) async fn run_dispatch(session: &Session, args: DispatchArgs) -> Result<(), AppError> {
    let loads: Vec<Load> = read_json(&args.loads)?;
    let agent = DispatchAgent::new(&session.config, &session.options)?;

    let result = agent
        .execute(DispatchRequest {
            loads,
            max_recommendations: args.max,
        })
        .await;
    render_dispatch(&result);

    session.export(agent.runtime())
}

pub(crate) async fn run_rates(session: &Session, args: RatesArgs) -> Result<(), AppError> {
    let historical_rates: Vec<LaneRate> = match &args.history {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let agent = RateAnalysisAgent::new(&session.config, &session.options)?;

    let result = agent
        .execute(LaneQuery {
            origin_city: args.origin_city,
            origin_state: args.origin_state,
            destination_city: args.destination_city,
            destination_state: args.destination_state,
            distance_miles: args.distance,
            historical_rates,
        })
        .await;
    render_rates(&result);

    session.export(agent.runtime())
}

pub(crate) async fn run_hos(session: &Session, args: HosArgs) -> Result<(), AppError> {
    let agent = ComplianceAgent::new(&session.config, &session.options)?;
    let check = HosCheck {
        driver_id: args.driver_id,
        current_status: args.status,
        drive_hours_today: args.drive_hours,
        on_duty_hours_today: args.on_duty_hours,
        last_break_time: args.last_break,
        as_of: Utc::now(),
    };

    let status = agent.check_hos_compliance(&check);
    render_hos(&status);

    let summary = agent.execute(ComplianceRequest::Hos(check)).await;
    render_compliance(&summary);

    session.export(agent.runtime())
}

pub(crate) fn run_ifta(session: &Session, args: IftaArgs) -> Result<(), AppError> {
    let request = IftaRequest {
        quarter: args.quarter,
        year: args.year,
        mileage_records: imports::mileage_from_path(&args.mileage_csv)?,
        fuel_purchases: imports::fuel_from_path(&args.fuel_csv)?,
    };
    let agent = ComplianceAgent::new(&session.config, &session.options)?;

    let report = agent.calculate_ifta_report(&request);
    render_ifta(&report);

    session.export(agent.runtime())
}

pub(crate) fn run_settle(session: &Session, args: SettleArgs) -> Result<(), AppError> {
    let request: SettlementRequest = read_json(&args.input)?;
    let agent = SettlementAgent::new(&session.config, &session.options)?;

    let settlement = agent.calculate_settlement(&request);
    render_settlement(&settlement);

    session.export(agent.runtime())
}

pub(crate) async fn run_route(session: &Session, args: RouteArgs) -> Result<(), AppError> {
    let request: RouteRequest = read_json(&args.input)?;
    let agent = RouteOptimizerAgent::new(&session.config, &session.options)?;

    let result = agent.execute(request).await;
    render_route(&result);

    session.export(agent.runtime())
}

pub(crate) fn render_dispatch(result: &DispatchResult) {
    banner("DISPATCH AGENT RESULTS");
    println!("Loads Analyzed: {}", result.loads_analyzed);
    println!("Execution Time: {:.2}s", result.execution_time_seconds);

    if let Some(top) = &result.top_recommendation {
        println!("\nTOP RECOMMENDATION:");
        println!("  Load ID: {}", top.load.load_id());
        println!("  Score: {:.1}/100", top.score);
        println!("  Route: {} → {}", top.load.origin(), top.load.destination());
        println!(
            "  Rate/Mile: ${:.2}",
            top.profitability_metrics.rate_per_loaded_mile
        );
        println!("  Net Profit: ${:.2}", top.profitability_metrics.net_profit);
        println!("\n  Reasoning: {}", top.reasoning);
        if !top.warnings.is_empty() {
            println!("\n  Warnings:");
            for warning in &top.warnings {
                println!("    - {warning}");
            }
        }
    }

    if result.recommendations.len() > 1 {
        println!("\nRANKING:");
        for (rank, recommendation) in result.recommendations.iter().enumerate() {
            println!(
                "  {}. {} score {:.1} (${:.2}/mi, {:.1}% deadhead)",
                rank + 1,
                recommendation.load.load_id(),
                recommendation.score,
                recommendation.profitability_metrics.rate_per_loaded_mile,
                recommendation.profitability_metrics.deadhead_percentage
            );
        }
    }
    closing_rule();
}

pub(crate) fn render_rates(result: &RateAnalysisResult) {
    banner("RATE ANALYSIS RESULTS");
    println!("Lane: {}", result.lane_description);
    println!("Distance: {} miles\n", result.distance_miles);

    println!("Recommended Rate: ${:.2}", result.recommended_rate);
    if result.distance_miles > 0 {
        println!(
            "  (${:.2}/mile)",
            result.recommended_rate / Decimal::from(result.distance_miles)
        );
    }
    println!("Minimum Acceptable: ${:.2}", result.minimum_acceptable_rate);
    println!("Target Rate: ${:.2}", result.target_rate);
    if let Some(average) = result.historical_average {
        println!("Historical Average: ${:.2}", average);
    }
    if let (Some(low), Some(high)) = (result.rate_range_low, result.rate_range_high) {
        println!("Observed Range: ${:.2} - ${:.2}", low, high);
    }

    println!("\nMarket Trend: {}", result.market_trend);
    println!("Confidence: {:.1}%", result.confidence_level * 100.0);
    println!("\nReasoning: {}\n", result.reasoning);
    bullet_list("Negotiation Tips", &result.negotiation_tips);
    bullet_list("Risk Factors", &result.risk_factors);
    closing_rule();
}

pub(crate) fn render_hos(status: &HosStatus) {
    banner("HOS COMPLIANCE CHECK");
    println!("Driver: {}", status.driver_id);
    println!("Status: {}", status.current_status.label());
    println!("Hours Driven: {:.1}h", status.hours_driven_today);
    println!("Hours Available: {:.1}h", status.hours_available_to_drive);
    println!("On-Duty Available: {:.1}h", status.hours_available_on_duty);
    println!("Until Required Break: {:.1}h\n", status.hours_until_required_break);
    bullet_list("VIOLATIONS", &status.violations);
    bullet_list("WARNINGS", &status.warnings);
}

pub(crate) fn render_compliance(result: &ComplianceResult) {
    println!("\nOverall: {}", result.status);
    bullet_list("Findings", &result.findings);
    bullet_list("Recommendations", &result.recommendations);
    closing_rule();
}

pub(crate) fn render_ifta(report: &IftaReport) {
    banner("IFTA REPORT");
    println!("Quarter: {}", report.quarter);
    println!("Home Jurisdiction: {}", report.home_jurisdiction);
    println!("Total Miles: {}", report.total_miles);
    println!("Total Gallons: {:.1}", report.total_gallons);
    println!("Fleet MPG: {:.2}", report.fleet_mpg);
    println!("Net Tax Due: ${:.2}\n", report.net_tax_due);

    println!("By Jurisdiction:");
    for (jurisdiction, data) in &report.jurisdiction_data {
        println!("  {jurisdiction}:");
        println!("    Miles: {}", data.miles);
        println!("    Fuel Purchased: {:.1} gal", data.gallons);
        println!("    Tax: ${:.2}", data.tax_owed);
    }
    closing_rule();
}

pub(crate) fn render_settlement(settlement: &Settlement) {
    banner("DRIVER SETTLEMENT REPORT");
    println!("Settlement ID: {}", settlement.settlement_id);
    println!(
        "Driver: {} ({})",
        settlement.driver_name, settlement.driver_id
    );
    println!(
        "Period: {} to {}\n",
        settlement.period_start.date_naive(),
        settlement.period_end.date_naive()
    );

    println!("EARNINGS:");
    println!("  Loads Completed: {}", settlement.total_loads);
    println!("  Total Miles: {}", settlement.total_miles);
    println!("  Gross Earnings: ${:.2}\n", settlement.gross_earnings);

    println!("DEDUCTIONS:");
    println!("  Advances: ${:.2}", settlement.total_advances);
    println!("  Expenses: ${:.2}", settlement.total_expenses);
    println!("  Insurance: ${:.2}", settlement.insurance_deduction);
    println!("  Other: ${:.2}", settlement.other_deductions);
    println!("  Total Deductions: ${:.2}\n", settlement.total_deductions);

    if settlement.total_reimbursements > Decimal::ZERO {
        println!("REIMBURSEMENTS: ${:.2}\n", settlement.total_reimbursements);
    }

    println!("NET PAY: ${:.2}", settlement.net_pay);
    println!(
        "Status: {}\n",
        settlement.pay_status.label().to_ascii_uppercase()
    );
    bullet_list("NOTES", &settlement.notes);

    println!("\nLOAD DETAILS:");
    for line in &settlement.loads {
        println!("  {}:", line.load_id);
        println!("    Gross: ${:.2}", line.gross_revenue);
        println!("    Driver Pay: ${:.2}", line.driver_gross_pay);
        println!("    Method: {}", line.calculation_method);
    }
    closing_rule();
}

pub(crate) fn render_route(result: &RouteOptimizationResult) {
    let route = &result.recommended_route;
    banner("ROUTE OPTIMIZATION RESULTS");
    println!("Origin: {}", result.origin);
    println!("Destination: {}\n", result.destination);

    println!("RECOMMENDED ROUTE:");
    println!("  {}", route.route_name);
    println!("  Distance: {} miles", route.total_distance_miles);
    println!("  Time: {:.1} hours", route.total_time_hours);
    println!("  Fuel Cost: ${:.2}", route.total_fuel_cost);
    println!("  Toll Cost: ${:.2}", route.total_toll_cost);
    println!("  Total Cost: ${:.2}", route.total_cost);
    println!("  Reasoning: {}\n", result.reasoning);
    bullet_list("  Advantages", &route.advantages);

    if !result.alternative_routes.is_empty() {
        println!("\nALTERNATIVE ROUTES:");
        for alternative in &result.alternative_routes {
            println!(
                "  {}: {}mi, ${:.2}",
                alternative.route_name, alternative.total_distance_miles, alternative.total_cost
            );
        }
    }

    if !result.backhaul_opportunities.is_empty() {
        println!("\nBACKHAUL OPPORTUNITIES:");
        for opportunity in &result.backhaul_opportunities {
            println!(
                "  {} ({} → {}): compatibility {:.0}, {}",
                opportunity.load.load_id(),
                opportunity.load.origin(),
                opportunity.load.destination(),
                opportunity.compatibility_score,
                opportunity.reasoning
            );
        }
    }
    closing_rule();
}
