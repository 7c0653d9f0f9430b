use super::{extract_json, GenerationError, GenerationRequest, TextGenerator};
use crate::config::ModelConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Typed target for a model reply.
pub trait ResponseContract: DeserializeOwned {
    /// JSON skeleton shown to the model in the prompt.
    const SHAPE: &'static str;

    /// Reject decoded values that are out of range.
    fn validate(&self) -> Result<(), String>;
}

/// Temperature and token ceiling for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallBudget {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CallBudget {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }

    /// Settings on the assigned model take precedence over the call site's.
    pub fn configured_by(self, model: &ModelConfig) -> Self {
        Self {
            temperature: model.temperature.unwrap_or(self.temperature),
            max_tokens: model.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentFailure {
    #[error("context could not be serialized: {0}")]
    Context(#[source] serde_json::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("reply was not valid JSON for the expected shape: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("reply failed validation: {0}")]
    Invalid(String),
}

/// Outcome of an enrichment attempt. Failures are values, never errors.
#[derive(Debug)]
pub enum Enrichment<T> {
    Enriched(T),
    Fallback { reason: EnrichmentFailure },
}

impl<T> Enrichment<T> {
    pub fn is_enriched(&self) -> bool {
        matches!(self, Enrichment::Enriched(_))
    }

    /// Take the enriched value or build the fallback.
    pub fn or_fallback(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Enrichment::Enriched(value) => value,
            Enrichment::Fallback { .. } => fallback(),
        }
    }
}

/// Prompts one model on behalf of an agent and decodes the structured reply.
#[derive(Clone)]
pub struct Enricher {
    agent: &'static str,
    generator: Arc<dyn TextGenerator>,
    model: ModelConfig,
    system_prompt: String,
}

impl Enricher {
    pub fn new(
        agent: &'static str,
        generator: Arc<dyn TextGenerator>,
        model: ModelConfig,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            generator,
            model,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// One call, one decode. Any failure is logged and returned as
    /// [`Enrichment::Fallback`].
    pub async fn enrich<C, X>(&self, instructions: &str, context: &X, budget: CallBudget) -> Enrichment<C>
    where
        C: ResponseContract,
        X: Serialize + ?Sized,
    {
        match self.attempt(instructions, context, budget).await {
            Ok(value) => Enrichment::Enriched(value),
            Err(reason) => {
                warn!(
                    agent = self.agent,
                    model = %self.model.model,
                    reason = %reason,
                    "llm_call_failed"
                );
                Enrichment::Fallback { reason }
            }
        }
    }

    async fn attempt<C, X>(
        &self,
        instructions: &str,
        context: &X,
        budget: CallBudget,
    ) -> Result<C, EnrichmentFailure>
    where
        C: ResponseContract,
        X: Serialize + ?Sized,
    {
        let prompt = build_prompt(instructions, context, C::SHAPE)?;
        let budget = budget.configured_by(&self.model);
        let timeout = self.model.timeout();
        let request = GenerationRequest {
            prompt,
            system_prompt: Some(self.system_prompt.clone()).filter(|s| !s.is_empty()),
            model: self.model.model.clone(),
            temperature: budget.temperature,
            max_tokens: budget.max_tokens,
            timeout,
        };

        info!(
            agent = self.agent,
            provider = %self.model.provider,
            model = %self.model.model,
            temperature = budget.temperature,
            max_tokens = budget.max_tokens,
            "calling_llm"
        );

        let reply = tokio::time::timeout(timeout, self.generator.generate(request))
            .await
            .map_err(|_| EnrichmentFailure::Timeout(timeout))??;

        decode_response(&reply)
    }
}

pub(crate) fn build_prompt<X: Serialize + ?Sized>(
    instructions: &str,
    context: &X,
    shape: &str,
) -> Result<String, EnrichmentFailure> {
    let context = serde_json::to_string_pretty(context).map_err(EnrichmentFailure::Context)?;
    Ok(format!(
        "{instructions}\n\nContext:\n{context}\n\nRespond with JSON only, matching this shape:\n{shape}\n"
    ))
}

pub(crate) fn decode_response<C: ResponseContract>(reply: &str) -> Result<C, EnrichmentFailure> {
    let decoded: C =
        serde_json::from_str(extract_json(reply)).map_err(EnrichmentFailure::MalformedJson)?;
    decoded.validate().map_err(EnrichmentFailure::Invalid)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        score: f64,
    }

    impl ResponseContract for Verdict {
        const SHAPE: &'static str = r#"{"score": <0-100>}"#;

        fn validate(&self) -> Result<(), String> {
            if (0.0..=100.0).contains(&self.score) {
                Ok(())
            } else {
                Err(format!("score {} outside 0-100", self.score))
            }
        }
    }

    struct Canned {
        reply: Result<&'static str, ()>,
        delay: Duration,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.seen.lock().expect("lock").push(request);
            tokio::time::sleep(self.delay).await;
            self.reply
                .map(str::to_string)
                .map_err(|_| GenerationError::EmptyResponse)
        }
    }

    fn enricher(reply: Result<&'static str, ()>, delay: Duration, timeout_seconds: u64) -> (Enricher, Arc<Canned>) {
        let canned = Arc::new(Canned {
            reply,
            delay,
            seen: Mutex::new(Vec::new()),
        });
        let model = ModelConfig {
            provider: Provider::Anthropic,
            model: "claude-test".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_seconds,
            base_url: None,
        };
        (
            Enricher::new("dispatch", canned.clone(), model, "You are a dispatcher."),
            canned,
        )
    }

    #[tokio::test]
    async fn decodes_fenced_reply() {
        let (enricher, canned) = enricher(Ok("```json\n{\"score\": 72}\n```"), Duration::ZERO, 5);
        let outcome: Enrichment<Verdict> = enricher
            .enrich("Score this load.", &serde_json::json!({"load_id": "L1"}), CallBudget::new(0.2, 1024))
            .await;

        assert!(matches!(outcome, Enrichment::Enriched(Verdict { score }) if score == 72.0));

        let seen = canned.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 1024);
        assert_eq!(seen[0].system_prompt.as_deref(), Some("You are a dispatcher."));
        assert!(seen[0].prompt.contains("\"load_id\": \"L1\""));
        assert!(seen[0].prompt.contains(Verdict::SHAPE));
    }

    #[tokio::test]
    async fn assigned_model_settings_override_call_budget() {
        let canned = Arc::new(Canned {
            reply: Ok("{\"score\": 10}"),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        });
        let model = ModelConfig {
            provider: Provider::OpenAi,
            model: "gpt-test".to_string(),
            temperature: Some(0.7),
            max_tokens: Some(256),
            timeout_seconds: 5,
            base_url: None,
        };
        let enricher = Enricher::new("dispatch", canned.clone(), model, "");
        let outcome: Enrichment<Verdict> = enricher
            .enrich("Score.", &(), CallBudget::new(0.2, 1024))
            .await;
        assert!(outcome.is_enriched());

        let seen = canned.seen.lock().expect("lock");
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].max_tokens, 256);
        assert_eq!(seen[0].system_prompt, None);
    }

    #[test]
    fn unset_model_settings_keep_call_budget() {
        let model = ModelConfig {
            provider: Provider::Anthropic,
            model: "claude-test".to_string(),
            temperature: None,
            max_tokens: Some(2048),
            timeout_seconds: 5,
            base_url: None,
        };
        let budget = CallBudget::new(0.1, 1500).configured_by(&model);
        assert_eq!(budget, CallBudget::new(0.1, 2048));
    }

    #[tokio::test]
    async fn out_of_range_reply_falls_back() {
        let (enricher, _) = enricher(Ok("{\"score\": 140}"), Duration::ZERO, 5);
        let outcome: Enrichment<Verdict> = enricher
            .enrich("Score.", &(), CallBudget::new(0.2, 16))
            .await;
        assert!(matches!(
            outcome,
            Enrichment::Fallback {
                reason: EnrichmentFailure::Invalid(_)
            }
        ));
    }

    #[tokio::test]
    async fn malformed_and_failed_replies_fall_back() {
        let (enricher, _) = enricher(Ok("I think it's a fine load."), Duration::ZERO, 5);
        let outcome: Enrichment<Verdict> = enricher.enrich("Score.", &(), CallBudget::new(0.2, 16)).await;
        assert!(matches!(
            outcome,
            Enrichment::Fallback {
                reason: EnrichmentFailure::MalformedJson(_)
            }
        ));

        let (enricher, _) = enricher_failing();
        let outcome: Enrichment<Verdict> = enricher.enrich("Score.", &(), CallBudget::new(0.2, 16)).await;
        assert!(matches!(
            outcome,
            Enrichment::Fallback {
                reason: EnrichmentFailure::Generation(GenerationError::EmptyResponse)
            }
        ));
    }

    fn enricher_failing() -> (Enricher, Arc<Canned>) {
        enricher(Err(()), Duration::ZERO, 5)
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let (enricher, _) = enricher(Ok("{\"score\": 50}"), Duration::from_secs(30), 1);
        let outcome: Enrichment<Verdict> = enricher.enrich("Score.", &(), CallBudget::new(0.2, 16)).await;
        match outcome {
            Enrichment::Fallback {
                reason: EnrichmentFailure::Timeout(limit),
            } => assert_eq!(limit, Duration::from_secs(1)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn fallback_value_is_used_only_on_failure() {
        let enriched: Enrichment<u8> = Enrichment::Enriched(7);
        assert_eq!(enriched.or_fallback(|| 0), 7);

        let failed: Enrichment<u8> = Enrichment::Fallback {
            reason: EnrichmentFailure::Invalid("bad".to_string()),
        };
        assert!(!failed.is_enriched());
        assert_eq!(failed.or_fallback(|| 3), 3);
    }
}
