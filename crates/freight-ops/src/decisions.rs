//! Append-only audit trail of agent decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

/// One completed agent computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub timestamp: DateTime<Utc>,
    pub agent_name: String,
    pub decision_type: String,
    pub input_data: Value,
    pub reasoning: String,
    /// 0.0-1.0
    pub confidence: f64,
    pub output_data: Value,
    pub tools_used: Vec<String>,
    pub execution_time_seconds: f64,
}

impl Decision {
    pub fn new(
        agent_name: &str,
        decision_type: &str,
        input_data: Value,
        output_data: Value,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            agent_name: agent_name.to_string(),
            decision_type: decision_type.to_string(),
            input_data,
            reasoning: String::new(),
            confidence: 1.0,
            output_data,
            tools_used: Vec::new(),
            execution_time_seconds: 0.0,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Values outside 0-1 are clamped.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools_used = tools.iter().map(|tool| tool.to_string()).collect();
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.execution_time_seconds = elapsed.as_secs_f64();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionExportError {
    #[error("unable to serialize decisions: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unable to write decisions to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered decisions recorded by a single agent. Entries are never edited or removed.
#[derive(Debug, Default)]
pub struct DecisionLog {
    entries: Mutex<Vec<Decision>>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, decision: Decision) {
        info!(
            agent = %decision.agent_name,
            decision_type = %decision.decision_type,
            confidence = decision.confidence,
            reasoning = %decision.reasoning,
            execution_time = decision.execution_time_seconds,
            "agent_decision"
        );
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(decision);
    }

    pub fn snapshot(&self) -> Vec<Decision> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the log as a pretty-printed JSON array.
    pub fn export(&self, path: &Path) -> Result<usize, DecisionExportError> {
        let decisions = self.snapshot();
        let body = serde_json::to_string_pretty(&decisions)?;
        std::fs::write(path, body).map_err(|source| DecisionExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            filepath = %path.display(),
            count = decisions.len(),
            "decisions_exported"
        );
        Ok(decisions.len())
    }
}
