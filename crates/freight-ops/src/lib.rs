//! Freight operations toolkit for small hotshot and trucking carriers.
//!
//! Deterministic calculators (load profitability, IFTA, hours of service,
//! driver settlements, routing) sit under [`metrics`]. The [`agents`] wrap
//! them in business facades that may ask a hosted model for narrative
//! reasoning and fall back to [`scoring`] rules when it is unavailable.

pub mod agents;
pub mod config;
pub mod decisions;
pub mod domain;
pub mod error;
pub mod imports;
pub mod llm;
pub mod metrics;
pub mod scoring;
pub mod telemetry;
