use super::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::Provider;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Anthropic Messages API.
pub struct AnthropicGenerator {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl AnthropicGenerator {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.as_deref(),
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(Provider::Anthropic, &request, err))?;

        let parsed: AnthropicResponse = read_success(Provider::Anthropic, &request, response).await?;
        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        non_empty(text)
    }
}

/// OpenAI Chat Completions API, or any endpoint speaking the same dialect.
pub struct OpenAiGenerator {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = OpenAiRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(Provider::OpenAi, &request, err))?;

        let parsed: OpenAiResponse = read_success(Provider::OpenAi, &request, response).await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        non_empty(text)
    }
}

fn transport_error(
    provider: Provider,
    request: &GenerationRequest,
    err: reqwest::Error,
) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(request.timeout)
    } else {
        GenerationError::Transport {
            provider,
            source: err,
        }
    }
}

async fn read_success<T: for<'de> Deserialize<'de>>(
    provider: Provider,
    request: &GenerationRequest,
    response: Response,
) -> Result<T, GenerationError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
        return Err(GenerationError::Status {
            provider,
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| transport_error(provider, request, err))
}

fn non_empty(text: String) -> Result<String, GenerationError> {
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}
