//! Error types for the Veritas domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Veritas operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Generative capability errors ---
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    // --- Search tool errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failure modes of the generative capability.
///
/// Agents recover from every variant locally by substituting a degraded
/// message or fallback verdict; none of these may abort a running debate.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed generator output: {0}")]
    MalformedOutput(String),
}

/// Failure modes of a search tool or page fetch.
///
/// The tool access layer converts every variant except `NotImplemented`
/// into an empty result set; `NotImplemented` triggers a transparent
/// fallback to the general web tool.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search tool not found: {0}")]
    NotFound(String),

    #[error("Search tool not implemented: {0}")]
    NotImplemented(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request timed out after {timeout_secs}s: {tool}")]
    Timeout { tool: String, timeout_secs: u64 },

    #[error("Malformed response from {tool}: {reason}")]
    MalformedResponse { tool: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
