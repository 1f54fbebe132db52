//! Anthropic native generator implementation.
//!
//! Uses the Messages API directly:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - System prompt as a top-level field
//! - `generate_json` via forced tool use

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use veritas_core::error::GeneratorError;
use veritas_core::generator::{ChatMessage, ChatRole, Generator};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Anthropic Messages API generator.
pub struct AnthropicGenerator {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicGenerator {
    /// Create a new Anthropic generator.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: DEFAULT_MAX_TOKENS,
            client: build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
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

    /// Anthropic puts the system prompt in a top-level field, not in the
    /// message list.
    fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<serde_json::Value>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut api_messages = Vec::new();

        for msg in messages {
            match msg.role {
                ChatRole::System => system_parts.push(&msg.content),
                ChatRole::User => api_messages.push(serde_json::json!({
                    "role": "user",
                    "content": msg.content,
                })),
                ChatRole::Assistant => api_messages.push(serde_json::json!({
                    "role": "assistant",
                    "content": msg.content,
                })),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, api_messages)
    }

    async fn post_messages(
        &self,
        mut body: serde_json::Value,
        system: Option<String>,
    ) -> std::result::Result<MessagesResponse, GeneratorError> {
        if let Some(system) = system {
            body["system"] = serde_json::json!(system);
        }

        let url = format!("{}/v1/messages", self.base_url);

        debug!(model = %self.model, "Sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            warn!(status, body = %error_body, "Anthropic returned error");
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
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl Generator for AnthropicGenerator {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        let (system, api_messages) = Self::split_system(messages);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": api_messages,
        });

        let response = self.post_messages(body, system).await?;

        let text: String = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::ToolUse { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(text)
    }

    async fn generate_json(
        &self,
        messages: &[ChatMessage],
        schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GeneratorError> {
        let (system, api_messages) = Self::split_system(messages);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": api_messages,
            "tools": [{
                "name": "emit",
                "description": "Emit the structured result",
                "input_schema": schema,
            }],
            "tool_choice": {"type": "tool", "name": "emit"},
        });

        let response = self.post_messages(body, system).await?;

        response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { input, .. } => Some(input),
                ContentBlock::Text { .. } => None,
            })
            .ok_or_else(|| {
                GeneratorError::MalformedOutput("no tool_use block in response".into())
            })
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[allow(dead_code)]
        name: String,
        input: serde_json::Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_split_out() {
        let messages = vec![
            ChatMessage::system("be a judge"),
            ChatMessage::system("be fair"),
            ChatMessage::user("evaluate"),
        ];
        let (system, api) = AnthropicGenerator::split_system(&messages);
        assert_eq!(system.unwrap(), "be a judge\n\nbe fair");
        assert_eq!(api.len(), 1);
        assert_eq!(api[0]["role"], "user");
    }

    #[test]
    fn content_blocks_parse() {
        let raw = serde_json::json!({
            "content": [
                {"type": "text", "text": "hello"},
                {"type": "tool_use", "name": "emit", "input": {"verdict": "FALSO"}}
            ]
        });
        let response: MessagesResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.content.len(), 2);
        match &response.content[1] {
            ContentBlock::ToolUse { input, .. } => assert_eq!(input["verdict"], "FALSO"),
            _ => panic!("expected tool_use block"),
        }
    }
}
