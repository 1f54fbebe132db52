//! OpenAI-compatible generator implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any
//! endpoint exposing `/v1/chat/completions`.
//!
//! `generate_json` uses function calling to constrain the output shape,
//! falling back to text extraction when the endpoint returns plain content.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use veritas_core::error::GeneratorError;
use veritas_core::generator::{ChatMessage, ChatRole, Generator, extract_json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// An OpenAI-compatible generator.
pub struct OpenAiCompatGenerator {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    /// Create a new OpenAI-compatible generator.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            client: build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create an OpenAI generator (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", DEFAULT_BASE_URL, api_key, model)
    }

    /// Override the base URL (e.g., for a proxy or local endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.client = build_client(timeout.as_secs());
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn to_api_messages(messages: &[ChatMessage]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        ChatRole::System => "system",
                        ChatRole::User => "user",
                        ChatRole::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect()
    }

    async fn post_chat(
        &self,
        body: serde_json::Value,
    ) -> std::result::Result<ApiResponse, GeneratorError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(backend = %self.name, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(e.to_string())
                } else {
                    GeneratorError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GeneratorError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(GeneratorError::AuthenticationFailed(
                "invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Generator backend returned error");
            return Err(GeneratorError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        response.json().await.map_err(|e| GeneratorError::ApiError {
            status_code: 200,
            message: format!("failed to parse response: {e}"),
        })
    }

    fn first_choice(response: ApiResponse) -> std::result::Result<ApiMessage, GeneratorError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| GeneratorError::ApiError {
                status_code: 200,
                message: "no choices in response".into(),
            })
    }
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl Generator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
        });

        let message = Self::first_choice(self.post_chat(body).await?)?;
        Ok(message.content.unwrap_or_default())
    }

    async fn generate_json(
        &self,
        messages: &[ChatMessage],
        schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GeneratorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
            "tools": [{
                "type": "function",
                "function": {
                    "name": "emit",
                    "description": "Emit the structured result",
                    "parameters": schema,
                },
            }],
            "tool_choice": {"type": "function", "function": {"name": "emit"}},
        });

        let message = Self::first_choice(self.post_chat(body).await?)?;

        if let Some(call) = message.tool_calls.into_iter().next() {
            return serde_json::from_str(&call.function.arguments).map_err(|e| {
                GeneratorError::MalformedOutput(format!("invalid function arguments: {e}"))
            });
        }

        // Some compatible backends ignore tool_choice and answer in text.
        let content = message.content.unwrap_or_default();
        extract_json(&content).ok_or_else(|| {
            GeneratorError::MalformedOutput("no structured output in response".into())
        })
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,

    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Deserialize)]
struct ApiToolCall {
    function: ApiFunction,
}

#[derive(Deserialize)]
struct ApiFunction {
    arguments: String,
}
