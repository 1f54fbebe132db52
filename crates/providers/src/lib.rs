//! Generator (LLM backend) implementations for Veritas.
//!
//! All backends implement the `veritas_core::Generator` trait. The
//! `from_config` factory picks a backend from the configured credentials,
//! preferring Anthropic, then any OpenAI-compatible endpoint.

pub mod anthropic;
pub mod fallback;
pub mod openai_compat;

pub use anthropic::AnthropicGenerator;
pub use fallback::FallbackGenerator;
pub use openai_compat::OpenAiCompatGenerator;

use std::sync::Arc;

use veritas_config::GeneratorConfig;
use veritas_core::error::GeneratorError;
use veritas_core::generator::Generator;

/// Build a generator from the configured credentials.
///
/// Preference order: Anthropic, then OpenAI-compatible. Returns
/// `NotConfigured` when neither key is present.
pub fn from_config(config: &GeneratorConfig) -> Result<Arc<dyn Generator>, GeneratorError> {
    if let Some(key) = &config.anthropic_api_key {
        let mut generator = AnthropicGenerator::new(key, &config.model)
            .with_temperature(config.temperature)
            .with_timeout(std::time::Duration::from_secs(config.timeout_secs));
        if let Some(base_url) = &config.base_url {
            generator = generator.with_base_url(base_url);
        }
        return Ok(Arc::new(generator));
    }

    if let Some(key) = &config.openai_api_key {
        let mut generator = OpenAiCompatGenerator::openai(key, &config.model)
            .with_temperature(config.temperature)
            .with_timeout(std::time::Duration::from_secs(config.timeout_secs));
        if let Some(base_url) = &config.base_url {
            generator = generator.with_base_url(base_url);
        }
        return Ok(Arc::new(generator));
    }

    Err(GeneratorError::NotConfigured(
        "no API key found; set ANTHROPIC_API_KEY or OPENAI_API_KEY".into(),
    ))
}
