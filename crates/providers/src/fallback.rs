//! Generator fallback — ordered retry chain with per-backend timeouts.
//!
//! When a backend fails (timeout, rate limit, error), automatically tries
//! the next backend in the configured chain.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use veritas_core::error::GeneratorError;
use veritas_core::generator::{ChatMessage, Generator};

/// A generator that wraps an ordered list of backends and falls back on
/// failure.
pub struct FallbackGenerator {
    name: String,
    chain: Vec<FallbackEntry>,
}

struct FallbackEntry {
    generator: Arc<dyn Generator>,
    timeout: Duration,
}

impl FallbackGenerator {
    /// Create a new fallback generator with no entries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: Vec::new(),
        }
    }

    /// Add a backend to the chain with a custom timeout.
    pub fn add(mut self, generator: Arc<dyn Generator>, timeout: Duration) -> Self {
        self.chain.push(FallbackEntry { generator, timeout });
        self
    }

    /// Add a backend with the default timeout (120s).
    pub fn add_default(self, generator: Arc<dyn Generator>) -> Self {
        self.add(generator, Duration::from_secs(120))
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[async_trait]
impl Generator for FallbackGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        let mut last_error = GeneratorError::NotConfigured("no backends in fallback chain".into());

        for (i, entry) in self.chain.iter().enumerate() {
            let backend = entry.generator.name().to_string();

            info!(
                backend = %backend,
                attempt = i + 1,
                total = self.chain.len(),
                "Fallback: trying backend"
            );

            match tokio::time::timeout(entry.timeout, entry.generator.generate(messages)).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => {
                    warn!(backend = %backend, error = %e, "Fallback: backend failed, trying next");
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        backend = %backend,
                        timeout_secs = entry.timeout.as_secs(),
                        "Fallback: backend timed out, trying next"
                    );
                    last_error = GeneratorError::Timeout(format!(
                        "backend '{}' timed out after {}s",
                        backend,
                        entry.timeout.as_secs()
                    ));
                }
            }
        }

        Err(last_error)
    }

    async fn generate_json(
        &self,
        messages: &[ChatMessage],
        schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GeneratorError> {
        let mut last_error = GeneratorError::NotConfigured("no backends in fallback chain".into());

        for (i, entry) in self.chain.iter().enumerate() {
            let backend = entry.generator.name().to_string();

            info!(
                backend = %backend,
                attempt = i + 1,
                total = self.chain.len(),
                "Fallback: trying backend (structured)"
            );

            match tokio::time::timeout(
                entry.timeout,
                entry.generator.generate_json(messages, schema),
            )
            .await
            {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    warn!(backend = %backend, error = %e, "Fallback: backend failed, trying next");
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        backend = %backend,
                        timeout_secs = entry.timeout.as_secs(),
                        "Fallback: backend timed out, trying next"
                    );
                    last_error = GeneratorError::Timeout(format!(
                        "backend '{}' timed out after {}s",
                        backend,
                        entry.timeout.as_secs()
                    ));
                }
            }
        }

        Err(last_error)
    }
}
