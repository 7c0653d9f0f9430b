use super::{Agent, AgentError, AgentKind, AgentOptions, AgentRuntime};
use crate::config::AppConfig;
use crate::decisions::Decision;
use crate::domain::{DutyStatus, FuelPurchase, MileageRecord};
use crate::metrics::hos::{self, HosHours};
use crate::metrics::ifta::{self, JurisdictionSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use tracing::info;

const SECONDS_PER_HOUR: i64 = 3600;

/// Quarterly fuel-tax filing inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IftaRequest {
    /// Quarter label, e.g. `Q1`.
    pub quarter: String,
    pub year: i32,
    #[serde(default)]
    pub mileage_records: Vec<MileageRecord>,
    #[serde(default)]
    pub fuel_purchases: Vec<FuelPurchase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IftaReport {
    /// e.g. `Q1 2024`
    pub quarter: String,
    pub year: i32,
    pub home_jurisdiction: String,
    pub jurisdiction_data: BTreeMap<String, JurisdictionSummary>,
    pub total_miles: u32,
    pub total_gallons: Decimal,
    pub fleet_mpg: Decimal,
    pub total_tax_owed: Decimal,
    /// Negative values are a refund.
    pub net_tax_due: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// A driver's logged hours as of a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosCheck {
    pub driver_id: String,
    pub current_status: DutyStatus,
    pub drive_hours_today: Decimal,
    pub on_duty_hours_today: Decimal,
    #[serde(default)]
    pub last_break_time: Option<DateTime<Utc>>,
    /// Clock used to age the last break.
    pub as_of: DateTime<Utc>,
}

impl HosCheck {
    fn hours_since_break(&self) -> Option<Decimal> {
        self.last_break_time.map(|last_break| {
            let seconds = (self.as_of - last_break).num_seconds();
            Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosStatus {
    pub driver_id: String,
    pub current_status: DutyStatus,
    pub hours_driven_today: Decimal,
    pub hours_on_duty_today: Decimal,
    pub hours_available_to_drive: Decimal,
    pub hours_available_on_duty: Decimal,
    pub hours_until_required_break: Decimal,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceType {
    Ifta,
    Hos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    Violation,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "compliant"),
            ComplianceStatus::Warning => write!(f, "warning"),
            ComplianceStatus::Violation => write!(f, "violation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub timestamp: DateTime<Utc>,
    pub compliance_type: ComplianceType,
    pub status: ComplianceStatus,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub execution_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComplianceRequest {
    Hos(HosCheck),
    Ifta,
}

/// Fuel-tax apportionment and hours-of-service checks.
pub struct ComplianceAgent {
    runtime: AgentRuntime,
    home_jurisdiction: String,
}

impl ComplianceAgent {
    pub fn new(config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        Ok(Self {
            runtime: AgentRuntime::new(AgentKind::Compliance, config, options)?,
            home_jurisdiction: config.business.ifta.home_state.clone(),
        })
    }

    pub fn calculate_ifta_report(&self, request: &IftaRequest) -> IftaReport {
        let started = Instant::now();
        info!(
            quarter = %request.quarter,
            year = request.year,
            fuel_records = request.fuel_purchases.len(),
            mileage_records = request.mileage_records.len(),
            "calculating_ifta_report"
        );

        let apportionment = ifta::apportion(&request.mileage_records, &request.fuel_purchases);

        self.runtime.record(
            Decision::new(
                self.runtime.name(),
                "ifta_calculation",
                json!({
                    "quarter": request.quarter,
                    "year": request.year,
                    "jurisdictions": apportionment.jurisdictions.keys().collect::<Vec<_>>(),
                }),
                json!({
                    "total_miles": apportionment.total_miles,
                    "total_tax_owed": apportionment.total_tax_owed,
                }),
            )
            .with_reasoning(format!(
                "Calculated IFTA for {} jurisdictions",
                apportionment.jurisdictions.len()
            ))
            .with_confidence(1.0)
            .with_tools(&["ifta_calculator", "tax_rate_lookup"])
            .with_elapsed(started.elapsed()),
        );

        IftaReport {
            quarter: format!("{} {}", request.quarter, request.year),
            year: request.year,
            home_jurisdiction: self.home_jurisdiction.clone(),
            jurisdiction_data: apportionment.jurisdictions,
            total_miles: apportionment.total_miles,
            total_gallons: apportionment.total_gallons,
            fleet_mpg: apportionment.fleet_mpg,
            total_tax_owed: apportionment.total_tax_owed,
            net_tax_due: apportionment.net_tax_due,
            generated_at: Utc::now(),
        }
    }

    pub fn check_hos_compliance(&self, check: &HosCheck) -> HosStatus {
        let evaluation = hos::evaluate(&HosHours {
            drive_hours_today: check.drive_hours_today,
            on_duty_hours_today: check.on_duty_hours_today,
            hours_since_break: check.hours_since_break(),
        });

        info!(
            driver_id = %check.driver_id,
            violations = evaluation.violations.len(),
            warnings = evaluation.warnings.len(),
            "hos_compliance_check"
        );

        HosStatus {
            driver_id: check.driver_id.clone(),
            current_status: check.current_status,
            hours_driven_today: check.drive_hours_today,
            hours_on_duty_today: check.on_duty_hours_today,
            hours_available_to_drive: evaluation.hours_available_to_drive,
            hours_available_on_duty: evaluation.hours_available_on_duty,
            hours_until_required_break: evaluation.hours_until_required_break,
            violations: evaluation.violations,
            warnings: evaluation.warnings,
        }
    }

    fn hos_result(&self, check: &HosCheck) -> (ComplianceStatus, Vec<String>, Vec<String>) {
        let status = self.check_hos_compliance(check);

        let (level, findings) = if !status.violations.is_empty() {
            (ComplianceStatus::Violation, status.violations)
        } else if !status.warnings.is_empty() {
            (ComplianceStatus::Warning, status.warnings)
        } else {
            (
                ComplianceStatus::Compliant,
                vec!["All HOS requirements met".to_string()],
            )
        };

        let recommendations = if level == ComplianceStatus::Compliant {
            Vec::new()
        } else {
            vec![
                "Review driver schedules to ensure compliance".to_string(),
                "Consider implementing automated HOS tracking".to_string(),
            ]
        };

        (level, findings, recommendations)
    }
}

#[async_trait]
impl Agent for ComplianceAgent {
    type Request = ComplianceRequest;
    type Output = ComplianceResult;

    fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    async fn execute(&self, request: ComplianceRequest) -> ComplianceResult {
        let started = Instant::now();

        let (compliance_type, (status, findings, recommendations)) = match &request {
            ComplianceRequest::Hos(check) => (ComplianceType::Hos, self.hos_result(check)),
            ComplianceRequest::Ifta => (
                ComplianceType::Ifta,
                (
                    ComplianceStatus::Compliant,
                    vec!["IFTA tracking active".to_string()],
                    vec![
                        "Ensure all fuel receipts are retained".to_string(),
                        "Track miles by jurisdiction accurately".to_string(),
                    ],
                ),
            ),
        };

        ComplianceResult {
            timestamp: Utc::now(),
            compliance_type,
            status,
            findings,
            recommendations,
            execution_time_seconds: started.elapsed().as_secs_f64(),
        }
    }
}
