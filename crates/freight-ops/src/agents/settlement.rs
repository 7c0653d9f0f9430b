use super::{Agent, AgentError, AgentKind, AgentOptions, AgentRuntime};
use crate::config::AppConfig;
use crate::decisions::Decision;
use crate::domain::{Advance, DriverContract, Expense, Load};
use crate::metrics::settlement::{self, Settlement, SettlementPeriod};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::info;

/// Everything needed to pay a driver for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub contract: DriverContract,
    pub loads: Vec<Load>,
    #[serde(default)]
    pub advances: Vec<Advance>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Defaults to the time of calculation.
    #[serde(default)]
    pub period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub period_end: Option<DateTime<Utc>>,
}

/// Computes driver pay statements. Pure arithmetic; no model calls.
pub struct SettlementAgent {
    runtime: AgentRuntime,
}

impl SettlementAgent {
    pub fn new(config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        Ok(Self {
            runtime: AgentRuntime::new(AgentKind::Settlement, config, options)?,
        })
    }

    pub fn calculate_settlement(&self, request: &SettlementRequest) -> Settlement {
        self.calculate_settlement_at(request, Utc::now())
    }

    /// Same as [`Self::calculate_settlement`] with an explicit clock.
    pub fn calculate_settlement_at(
        &self,
        request: &SettlementRequest,
        now: DateTime<Utc>,
    ) -> Settlement {
        let started = Instant::now();
        info!(
            driver_id = %request.contract.driver_id,
            loads = request.loads.len(),
            advances = request.advances.len(),
            expenses = request.expenses.len(),
            "calculating_settlement"
        );

        let period = SettlementPeriod {
            start: request.period_start.unwrap_or(now),
            end: request.period_end.unwrap_or(now),
            generated_at: now,
        };
        let statement = settlement::settle(
            &request.contract,
            &request.loads,
            &request.advances,
            &request.expenses,
            period,
        );

        self.runtime.record(
            Decision::new(
                self.runtime.name(),
                "settlement_calculation",
                json!({
                    "driver_id": request.contract.driver_id,
                    "loads": request.loads.len(),
                }),
                json!({
                    "gross_earnings": statement.gross_earnings,
                    "net_pay": statement.net_pay,
                    "pay_status": statement.pay_status,
                }),
            )
            .with_reasoning(format!(
                "Calculated settlement for {} loads",
                request.loads.len()
            ))
            .with_confidence(1.0)
            .with_tools(&["settlement_calculator", "contract_interpreter"])
            .with_elapsed(started.elapsed()),
        );

        statement
    }
}

#[async_trait]
impl Agent for SettlementAgent {
    type Request = SettlementRequest;
    type Output = Settlement;

    fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    async fn execute(&self, request: SettlementRequest) -> Settlement {
        self.calculate_settlement(&request)
    }
}
