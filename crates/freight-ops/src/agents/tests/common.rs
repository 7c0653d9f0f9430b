use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::agents::AgentOptions;
use crate::config::{
    AgentModelConfig, AppConfig, BusinessConfig, Credentials, LlmConfig, ModelConfig, Provider,
};
use crate::domain::{Load, LoadDetails, Location};
use crate::llm::{GenerationError, GenerationRequest, TextGenerator};

pub(super) const AGENTS: [&str; 5] = [
    "dispatch",
    "rate_analysis",
    "compliance",
    "route_optimizer",
    "settlement",
];

pub(super) fn model(provider: Provider) -> ModelConfig {
    ModelConfig {
        provider,
        model: "test-model".to_string(),
        temperature: None,
        max_tokens: None,
        timeout_seconds: 5,
        base_url: None,
    }
}

pub(super) fn llm_config() -> LlmConfig {
    let mut config = LlmConfig::default();
    for agent in AGENTS {
        config.agent_assignments.insert(
            agent.to_string(),
            AgentModelConfig {
                primary_model: model(Provider::Anthropic),
                fallback_model: Some(model(Provider::OpenAi)),
                system_prompt_template: format!("You are the {agent} agent."),
            },
        );
    }
    config
}

pub(super) fn app_config() -> AppConfig {
    AppConfig::from_parts(BusinessConfig::default(), llm_config(), Credentials::default())
}

/// Replies from a fixed script, one per call, and remembers every request.
#[derive(Default)]
pub(super) struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub(super) fn replying(replies: &[&str]) -> Arc<Self> {
        let generator = Self::default();
        {
            let mut queue = generator.replies.lock().expect("script lock");
            for reply in replies {
                queue.push_back(Ok(reply.to_string()));
            }
        }
        Arc::new(generator)
    }

    pub(super) fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(super) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().expect("requests lock").push(request);
        self.replies
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Err(GenerationError::Status {
                provider: Provider::Anthropic,
                status: 503,
                message: "overloaded".to_string(),
            }))
    }
}

pub(super) fn options_with(generator: Arc<ScriptedGenerator>) -> AgentOptions {
    AgentOptions::with_generator(generator)
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn load_details(id: &str, rate: Decimal, loaded_miles: u32, deadhead_miles: u32) -> LoadDetails {
    LoadDetails {
        load_id: id.to_string(),
        broker_name: Some("Red River Logistics".to_string()),
        origin: Location::new("Tulsa", "OK"),
        destination: Location::new("Dallas", "TX"),
        pickup_date: at(3, 8),
        delivery_date: at(3, 14),
        commodity: "Auto Parts".to_string(),
        weight: 5000,
        rate,
        fuel_surcharge: Decimal::ZERO,
        additional_charges: Decimal::ZERO,
        loaded_miles,
        deadhead_miles,
        is_hazmat: false,
        is_team_required: false,
        is_expedited: false,
        requires_tarp: false,
        equipment_type: "Hotshot".to_string(),
    }
}

pub(super) fn load(id: &str, rate: Decimal, loaded_miles: u32, deadhead_miles: u32) -> Load {
    Load::new(load_details(id, rate, loaded_miles, deadhead_miles)).expect("valid load")
}

/// Good load: $2.60/mi, 7% deadhead.
pub(super) fn strong_load(id: &str) -> Load {
    load(id, dec!(650), 250, 20)
}

/// Poor load: $1.50/mi, 29% deadhead.
pub(super) fn weak_load(id: &str) -> Load {
    load(id, dec!(375), 250, 100)
}
