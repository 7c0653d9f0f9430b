//! One facade per business question. Each agent computes deterministic
//! metrics, optionally asks a model to explain them, and records the outcome
//! in its own decision log.

pub mod compliance;
pub mod dispatch;
pub mod rate_analysis;
pub mod route_optimizer;
pub mod settlement;

#[cfg(test)]
mod tests;

pub use compliance::ComplianceAgent;
pub use dispatch::DispatchAgent;
pub use rate_analysis::RateAnalysisAgent;
pub use route_optimizer::RouteOptimizerAgent;
pub use settlement::SettlementAgent;

use crate::config::{AgentModelConfig, AppConfig, ConfigError, ModelTier};
use crate::decisions::{Decision, DecisionExportError, DecisionLog};
use crate::llm::{
    generator_for, CallBudget, Enricher, Enrichment, EnrichmentFailure, GenerationError,
    OfflineGenerator, ResponseContract, TextGenerator,
};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Dispatch,
    RateAnalysis,
    Compliance,
    RouteOptimizer,
    Settlement,
}

impl AgentKind {
    /// Key used for the agent's entry in `llms.json` and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Dispatch => "dispatch",
            AgentKind::RateAnalysis => "rate_analysis",
            AgentKind::Compliance => "compliance",
            AgentKind::RouteOptimizer => "route_optimizer",
            AgentKind::Settlement => "settlement",
        }
    }

    fn uses_model(&self) -> bool {
        matches!(
            self,
            AgentKind::Dispatch | AgentKind::RateAnalysis | AgentKind::RouteOptimizer
        )
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent configuration invalid: {0}")]
    Config(#[from] ConfigError),
}

/// Where an agent's text generator comes from.
#[derive(Clone, Default)]
pub enum GeneratorSource {
    /// Build an HTTP client for the configured provider; requires its API key.
    #[default]
    Configured,
    /// Never call a model; every result comes from the rule-based fallbacks.
    Offline,
    Injected(Arc<dyn TextGenerator>),
}

impl fmt::Debug for GeneratorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorSource::Configured => write!(f, "Configured"),
            GeneratorSource::Offline => write!(f, "Offline"),
            GeneratorSource::Injected(_) => write!(f, "Injected(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub tier: ModelTier,
    pub generator: GeneratorSource,
}

impl AgentOptions {
    pub fn offline() -> Self {
        Self {
            tier: ModelTier::Primary,
            generator: GeneratorSource::Offline,
        }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            tier: ModelTier::Primary,
            generator: GeneratorSource::Injected(generator),
        }
    }
}

/// Plumbing shared by every agent: model assignment, generator and decision log.
pub struct AgentRuntime {
    kind: AgentKind,
    assignment: AgentModelConfig,
    enricher: Option<Enricher>,
    decisions: DecisionLog,
}

impl AgentRuntime {
    /// Fails when the agent has no model assignment, or when a model-backed
    /// agent is configured for a provider without an API key.
    pub fn new(kind: AgentKind, config: &AppConfig, options: &AgentOptions) -> Result<Self, AgentError> {
        let assignment = config.llm.agent(kind.name())?.clone();

        let enricher = if kind.uses_model() {
            let model = assignment.model(options.tier).clone();
            let generator: Arc<dyn TextGenerator> = match &options.generator {
                GeneratorSource::Configured => generator_for(&model, &config.credentials)?,
                GeneratorSource::Offline => Arc::new(OfflineGenerator),
                GeneratorSource::Injected(generator) => Arc::clone(generator),
            };
            Some(Enricher::new(
                kind.name(),
                generator,
                model,
                assignment.system_prompt_template.clone(),
            ))
        } else {
            None
        };

        info!(
            agent_name = kind.name(),
            model = %assignment.model(options.tier).model,
            "agent_initialized"
        );

        Ok(Self {
            kind,
            assignment,
            enricher,
            decisions: DecisionLog::new(),
        })
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn assignment(&self) -> &AgentModelConfig {
        &self.assignment
    }

    pub(crate) async fn enrich<C, X>(
        &self,
        instructions: &str,
        context: &X,
        budget: CallBudget,
    ) -> Enrichment<C>
    where
        C: ResponseContract,
        X: Serialize + ?Sized,
    {
        match &self.enricher {
            Some(enricher) => enricher.enrich(instructions, context, budget).await,
            None => Enrichment::Fallback {
                reason: EnrichmentFailure::Generation(GenerationError::Unavailable),
            },
        }
    }

    pub(crate) fn record(&self, decision: Decision) {
        self.decisions.append(decision);
    }

    pub fn decisions(&self) -> &DecisionLog {
        &self.decisions
    }

    pub fn export_decisions(&self, path: &Path) -> Result<usize, DecisionExportError> {
        self.decisions.export(path)
    }
}

/// A business facade with a single entry point.
#[async_trait]
pub trait Agent: Send + Sync {
    type Request: Send;
    type Output: Send;

    fn runtime(&self) -> &AgentRuntime;

    async fn execute(&self, request: Self::Request) -> Self::Output;

    fn name(&self) -> &'static str {
        self.runtime().name()
    }

    fn decisions(&self) -> &DecisionLog {
        self.runtime().decisions()
    }
}
