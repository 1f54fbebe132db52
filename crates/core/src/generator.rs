//! Generator trait — the abstraction over the generative capability.
//!
//! A Generator takes a list of role-tagged messages and returns generated
//! text, or a schema-constrained JSON value. Implementations live in the
//! providers crate; tests use scripted mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// The role of a chat message sent to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged message in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The opaque generative capability.
///
/// May fail with a [`GeneratorError`]; must never panic. Callers are
/// responsible for degrading gracefully on failure — nothing above this
/// boundary retries.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this backend (e.g., "anthropic", "openai").
    fn name(&self) -> &str;

    /// Generate free text from a list of role-tagged messages.
    async fn generate(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError>;

    /// Generate a JSON value conforming to `schema`.
    ///
    /// Default implementation generates text and extracts the first JSON
    /// object from it. Backends with native structured output override this.
    async fn generate_json(
        &self,
        messages: &[ChatMessage],
        _schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GeneratorError> {
        let text = self.generate(messages).await?;
        extract_json(&text).ok_or_else(|| {
            GeneratorError::MalformedOutput("no JSON object found in generated text".into())
        })
    }
}

/// Extract the first top-level JSON object embedded in free text.
///
/// Handles the common case of models wrapping JSON in prose or code fences.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_plain() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn extract_json_with_prose() {
        let value = extract_json("Here is the result:\n```json\n{\"ok\": true}\n```\nDone.").unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn extract_json_missing() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("} backwards {").is_none());
    }

    #[test]
    fn chat_message_constructors() {
        let msg = ChatMessage::system("You are a judge");
        assert_eq!(msg.role, ChatRole::System);
        assert_eq!(msg.content, "You are a judge");
    }

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            messages: &[ChatMessage],
        ) -> std::result::Result<String, GeneratorError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn default_generate_json_extracts_object() {
        let generator = EchoGenerator;
        let messages = vec![ChatMessage::user(r#"answer: {"verdict": "VERO"}"#)];
        let value = generator
            .generate_json(&messages, &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(value["verdict"], "VERO");
    }

    #[tokio::test]
    async fn default_generate_json_rejects_prose() {
        let generator = EchoGenerator;
        let messages = vec![ChatMessage::user("sorry, I cannot do that")];
        let err = generator
            .generate_json(&messages, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedOutput(_)));
    }
}
