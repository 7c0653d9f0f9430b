//! Deterministic calculators. Every function here is pure; agents layer
//! enrichment and logging on top.

pub mod hos;
pub mod ifta;
pub mod lane;
pub mod profitability;
pub mod route;
pub mod settlement;

pub use hos::{HosEvaluation, HosHours};
pub use ifta::{IftaApportionment, JurisdictionSummary};
pub use lane::{HistoricalSummary, LaneBaseline, LaneTotals};
pub use profitability::{load_metrics, CostProfile, LoadMetrics};
pub use route::{BackhaulOpportunity, RouteOption, RouteSegment};
pub use settlement::{LoadSettlement, PayStatus, Settlement, SettlementPeriod};
