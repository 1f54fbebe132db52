//! Tool access layer for Veritas.
//!
//! Serves search results and page fetches to the debate agents with
//! caching, deduplication of repeat queries within the TTL window, tiered
//! fallback across search backends, and per-agent search budgets. Every
//! underlying failure is converted to an empty result set at this
//! boundary — tool trouble degrades evidence quality, never the debate.

pub mod access;
pub mod brave;
pub mod budget;
pub mod cache;
pub mod duckduckgo;
pub mod factcheck;
pub mod fetch;
pub mod reliability;

pub use access::{SearchStrategy, ToolAccess};
pub use budget::SearchBudget;
pub use cache::TtlCache;
pub use reliability::assess_reliability;

use std::sync::Arc;
use std::time::Duration;

use veritas_config::ToolConfig;

use brave::BraveSearch;
use duckduckgo::DuckDuckGoSearch;
use factcheck::FactCheckSearch;
use fetch::HttpPageFetcher;

/// Build the default tool access layer from configuration: Brave as the
/// general tier, DuckDuckGo as the keyless second tier, Google PSE as the
/// fact-check tier, and an HTTP page fetcher.
pub fn default_access(config: &ToolConfig) -> ToolAccess {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    ToolAccess::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
        config.result_count,
    )
    .register(Arc::new(BraveSearch::new(
        config.brave_api_key.clone(),
        timeout,
    )))
    .register(Arc::new(DuckDuckGoSearch::new(timeout)))
    .register(Arc::new(FactCheckSearch::new(
        config.google_pse_api_key.clone(),
        config.google_pse_cx.clone(),
        timeout,
    )))
    .with_fetcher(Arc::new(HttpPageFetcher::new(timeout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_access_builds_and_serves() {
        let config = ToolConfig::default();
        let access = default_access(&config);
        // No credentials configured: the general tier returns empty rather
        // than erroring, and the result is cached.
        let hits = access.search_web("test query", "brave").await;
        assert!(hits.is_empty());
    }
}
