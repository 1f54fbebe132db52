//! Configuration loading, validation, and management for Veritas.
//!
//! Loads configuration from a TOML file with environment variable overrides
//! for API keys and model selection. Validates all settings before any
//! session starts — an out-of-bounds round count or search budget is a
//! session-entry validation failure, never a silent no-op.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use veritas_core::Personality;

/// The root configuration structure.
///
/// Maps directly to `~/.veritas/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generator (LLM backend) settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Tool access layer settings
    #[serde(default)]
    pub tools: ToolConfig,

    /// Default debate settings, overridable per session
    #[serde(default)]
    pub debate: DebateConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            tools: ToolConfig::default(),
            debate: DebateConfig::default(),
        }
    }
}

/// Generator backend settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Model identifier sent to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the backend base URL (e.g. a proxy or local endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,

    /// Anthropic API key (env: `ANTHROPIC_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    /// OpenAI-compatible API key (env: `OPENAI_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_generator_timeout() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            timeout_secs: default_generator_timeout(),
            anthropic_api_key: None,
            openai_api_key: None,
        }
    }
}

/// Tool access layer settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Cache entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum entries per cache (url cache and search cache each)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Per-request timeout for search tools and page fetches, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Results requested per underlying tool call
    #[serde(default = "default_result_count")]
    pub result_count: usize,

    /// Brave Search API key (env: `BRAVE_SEARCH_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brave_api_key: Option<String>,

    /// Google PSE fact-check key (env: `GOOGLE_PSE_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_pse_api_key: Option<String>,

    /// Google PSE engine id (env: `GOOGLE_PSE_CX`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_pse_cx: Option<String>,
}

fn default_cache_ttl() -> u64 {
    3600
}
fn default_cache_capacity() -> usize {
    1000
}
fn default_request_timeout() -> u64 {
    10
}
fn default_result_count() -> usize {
    10
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
            request_timeout_secs: default_request_timeout(),
            result_count: default_result_count(),
            brave_api_key: None,
            google_pse_api_key: None,
            google_pse_cx: None,
        }
    }
}

/// The session-entry contract: everything a caller may tune per debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Completed PRO/CONTRA rounds before the judge speaks (1..=10)
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Per-agent search budget: −1 = unlimited, 0 = no searches, else 1..=50
    #[serde(default = "default_max_searches")]
    pub max_searches: i32,

    /// Target language for all generated output
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub pro_personality: Personality,

    #[serde(default)]
    pub contra_personality: Personality,

    /// When true (default), PRO opens with zero research for fast first
    /// output; when false, PRO and CONTRA research the opening concurrently.
    #[serde(default = "default_true")]
    pub lazy_opening: bool,
}

fn default_max_rounds() -> u32 {
    3
}
fn default_max_searches() -> i32 {
    -1
}
fn default_language() -> String {
    "English".into()
}
fn default_true() -> bool {
    true
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_searches: default_max_searches(),
            language: default_language(),
            pro_personality: Personality::Assertive,
            contra_personality: Personality::Assertive,
            lazy_opening: default_true(),
        }
    }
}

impl DebateConfig {
    /// Maximum legal round count.
    pub const MAX_ROUNDS_LIMIT: u32 = 10;

    /// Maximum legal per-agent search budget.
    pub const MAX_SEARCHES_LIMIT: i32 = 50;

    /// Validate the session-entry contract.
    ///
    /// Called before the state machine starts; an invalid config never
    /// reaches the debate loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 || self.max_rounds > Self::MAX_ROUNDS_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "max_rounds must be between 1 and {}, got {}",
                Self::MAX_ROUNDS_LIMIT,
                self.max_rounds
            )));
        }

        if self.max_searches < -1 || self.max_searches > Self::MAX_SEARCHES_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "max_searches must be -1 (unlimited) or between 0 and {}, got {}",
                Self::MAX_SEARCHES_LIMIT,
                self.max_searches
            )));
        }

        if self.language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "language must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("generator", &self.generator)
            .field("tools", &self.tools)
            .field("debate", &self.debate)
            .finish()
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}

impl std::fmt::Debug for ToolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolConfig")
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("result_count", &self.result_count)
            .field("brave_api_key", &redact(&self.brave_api_key))
            .field("google_pse_api_key", &redact(&self.google_pse_api_key))
            .field("google_pse_cx", &redact(&self.google_pse_cx))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.veritas/config.toml`)
    /// with environment variable overrides for keys and model selection.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path. A missing file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (highest priority).
    pub fn apply_env_overrides(&mut self) {
        if self.generator.anthropic_api_key.is_none() {
            self.generator.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if self.generator.openai_api_key.is_none() {
            self.generator.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if let Ok(model) = std::env::var("VERITAS_MODEL") {
            self.generator.model = model;
        }
        if self.tools.brave_api_key.is_none() {
            self.tools.brave_api_key = std::env::var("BRAVE_SEARCH_API_KEY").ok();
        }
        if self.tools.google_pse_api_key.is_none() {
            self.tools.google_pse_api_key = std::env::var("GOOGLE_PSE_API_KEY").ok();
        }
        if self.tools.google_pse_cx.is_none() {
            self.tools.google_pse_cx = std::env::var("GOOGLE_PSE_CX").ok();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".veritas")
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.temperature < 0.0 || self.generator.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generator.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.tools.cache_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "tools.cache_capacity must be at least 1".into(),
            ));
        }

        if self.tools.result_count == 0 {
            return Err(ConfigError::ValidationError(
                "tools.result_count must be at least 1".into(),
            ));
        }

        self.debate.validate()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for veritas_core::Error {
    fn from(err: ConfigError) -> Self {
        veritas_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debate.max_rounds, 3);
        assert_eq!(config.debate.max_searches, -1);
        assert_eq!(config.tools.cache_ttl_secs, 3600);
        assert!(config.debate.lazy_opening);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generator.model, config.generator.model);
        assert_eq!(parsed.debate.max_rounds, config.debate.max_rounds);
    }

    #[test]
    fn zero_rounds_rejected() {
        let config = DebateConfig {
            max_rounds: 0,
            ..DebateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn excessive_rounds_rejected() {
        let config = DebateConfig {
            max_rounds: 11,
            ..DebateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_search_budget_is_legal() {
        let config = DebateConfig {
            max_searches: 0,
            ..DebateConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn below_sentinel_budget_rejected() {
        let config = DebateConfig {
            max_searches: -2,
            ..DebateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_language_rejected() {
        let config = DebateConfig {
            language: "  ".into(),
            ..DebateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().debate.max_rounds, 3);
    }

    #[test]
    fn invalid_file_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[debate]\nmax_rounds = 99\n").unwrap();
        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unparseable_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml {{{").unwrap();
        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig {
            generator: GeneratorConfig {
                anthropic_api_key: Some("sk-secret".into()),
                ..GeneratorConfig::default()
            },
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
