use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Text-generation vendors the agents know how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    OpenAi,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Anthropic => write!(f, "anthropic"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: Provider,
    pub model: String,
    /// Replaces the agent's per-call temperature when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Replaces the agent's per-call token ceiling when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Override for self-hosted or proxied endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    60
}

/// Which of an agent's configured models to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTier {
    #[default]
    Primary,
    Fallback,
}

/// Model assignment and prompt template for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentModelConfig {
    pub primary_model: ModelConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<ModelConfig>,
    pub system_prompt_template: String,
}

impl AgentModelConfig {
    /// Resolve the model for a tier; agents without a fallback keep using the primary.
    pub fn model(&self, tier: ModelTier) -> &ModelConfig {
        match tier {
            ModelTier::Primary => &self.primary_model,
            ModelTier::Fallback => self.fallback_model.as_ref().unwrap_or(&self.primary_model),
        }
    }
}

/// Contents of `llms.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub agent_assignments: BTreeMap<String, AgentModelConfig>,
}

impl LlmConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn agent(&self, agent_name: &str) -> Result<&AgentModelConfig, ConfigError> {
        self.agent_assignments
            .get(agent_name)
            .ok_or_else(|| ConfigError::MissingAgentAssignment(agent_name.to_string()))
    }
}

/// Provider API keys pulled from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
        }
    }

    pub fn api_key(&self, provider: Provider) -> Result<&str, ConfigError> {
        let key = match provider {
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
        };
        key.ok_or(ConfigError::MissingApiKey(provider))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "***"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
