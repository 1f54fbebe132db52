//! The tool access layer.
//!
//! Serves search results and page fetches to agents with caching,
//! tiered dispatch strategies, and conversion of every underlying tool
//! failure into an empty result set. Nothing in here propagates an error
//! upward — a debate must never die because a search backend did.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use veritas_core::error::SearchError;
use veritas_core::search::{PageContent, PageFetcher, SearchHit, SearchTool};

use crate::budget::SearchBudget;
use crate::cache::TtlCache;

/// Tiered search strategies, selected by the calling agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Fact-check tool first (if its credentials are configured); fall back
    /// to the general web tool on zero results.
    FactCheckFirst,
    /// General tool, then (budget permitting) a second independent tool;
    /// union of both result sets.
    WebDeepDive,
    /// General tool with authoritative-domain intent. The bias itself is
    /// applied during Source construction, not here.
    Institutional,
    /// Single general-tool call. Also the fallback for anything
    /// unrecognized.
    #[default]
    Basic,
}

/// Caching, tiering front door over the registered search tools.
///
/// Stateless apart from its caches; safe to share across agents and
/// sessions as a singleton handle.
pub struct ToolAccess {
    tools: HashMap<String, Arc<dyn SearchTool>>,
    fetcher: Option<Arc<dyn PageFetcher>>,
    search_cache: TtlCache<Vec<SearchHit>>,
    url_cache: TtlCache<PageContent>,
    general_tool: String,
    secondary_tool: String,
    fact_check_tool: String,
    result_count: usize,
}

impl ToolAccess {
    /// Create an empty access layer. Register tools before use.
    pub fn new(cache_capacity: usize, cache_ttl: Duration, result_count: usize) -> Self {
        Self {
            tools: HashMap::new(),
            fetcher: None,
            search_cache: TtlCache::new(cache_capacity, cache_ttl),
            url_cache: TtlCache::new(cache_capacity, cache_ttl),
            general_tool: "brave".into(),
            secondary_tool: "duckduckgo".into(),
            fact_check_tool: "factcheck".into(),
            result_count: result_count.max(1),
        }
    }

    /// Register a search tool. Replaces any existing tool with the same name.
    pub fn register(mut self, tool: Arc<dyn SearchTool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Set the page fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Override which registered tool is the general web tier.
    pub fn with_general_tool(mut self, name: impl Into<String>) -> Self {
        self.general_tool = name.into();
        self
    }

    /// Override which registered tool is the deep-dive second tier.
    pub fn with_secondary_tool(mut self, name: impl Into<String>) -> Self {
        self.secondary_tool = name.into();
        self
    }

    /// Override which registered tool is the fact-check tier.
    pub fn with_fact_check_tool(mut self, name: impl Into<String>) -> Self {
        self.fact_check_tool = name.into();
        self
    }

    /// Perform a web search through the cache.
    ///
    /// A cache hit returns the stored hits without re-invoking the tool.
    /// A miss invokes the tool and stores the result — empty results
    /// included, so a failing query is not retried within the TTL window.
    pub async fn search_web(&self, query: &str, tool: &str) -> Vec<SearchHit> {
        let key = search_cache_key(query, tool);

        if let Some(hits) = self.search_cache.get(&key) {
            debug!(query = %truncate(query), tool, "Cache hit for search");
            return hits;
        }

        info!(query = %truncate(query), tool, "Cache miss for search, executing query");

        let hits = self.call_tool(query, tool).await;
        self.search_cache.insert(key, hits.clone());
        hits
    }

    /// Fetch a page through the url cache. Failures yield `None` and are
    /// not cached, so a transient fetch error can be retried later.
    pub async fn fetch_page(&self, url: &str, agent: &str) -> Option<PageContent> {
        if let Some(content) = self.url_cache.get(url) {
            debug!(url, agent, "Cache hit for URL");
            return Some(content);
        }

        info!(url, agent, "Cache miss for URL, fetching content");

        let fetcher = self.fetcher.as_ref()?;
        match fetcher.fetch(url).await {
            Ok(content) => {
                self.url_cache.insert(url, content.clone());
                Some(content)
            }
            Err(e) => {
                error!(url, error = %e, "Page fetch failed");
                None
            }
        }
    }

    /// Run one tiered dispatch. The caller has already claimed one budget
    /// slot; only extra tiers (deep dive's second query) consume more.
    pub async fn dispatch(
        &self,
        query: &str,
        strategy: SearchStrategy,
        budget: &SearchBudget,
    ) -> Vec<SearchHit> {
        match strategy {
            SearchStrategy::FactCheckFirst => {
                let fact_tool_ready = self
                    .tools
                    .get(&self.fact_check_tool)
                    .is_some_and(|t| t.credentials_configured());

                if fact_tool_ready {
                    let results = self.search_web(query, &self.fact_check_tool).await;
                    if !results.is_empty() {
                        return results;
                    }
                    debug!(query = %truncate(query), "Fact-check tier empty, falling back to web");
                }

                self.search_web(query, &self.general_tool).await
            }

            SearchStrategy::WebDeepDive => {
                let mut results = self.search_web(query, &self.general_tool).await;
                if budget.try_acquire() {
                    let extra = self.search_web(query, &self.secondary_tool).await;
                    results.extend(extra);
                }
                results
            }

            SearchStrategy::Institutional | SearchStrategy::Basic => {
                self.search_web(query, &self.general_tool).await
            }
        }
    }

    /// Invoke one tool, converting every failure into an empty result list.
    /// A `NotImplemented` tool transparently falls back to the general tool.
    async fn call_tool(&self, query: &str, tool: &str) -> Vec<SearchHit> {
        let Some(search_tool) = self.tools.get(tool) else {
            error!(tool, "Search tool not registered");
            return Vec::new();
        };

        match search_tool.call(query, self.result_count).await {
            Ok(mut hits) => {
                hits.truncate(self.result_count);
                info!(tool, results = hits.len(), "Search completed successfully");
                hits
            }
            Err(SearchError::NotImplemented(_)) if tool != self.general_tool => {
                warn!(tool, fallback = %self.general_tool, "Tool not implemented, falling back");
                match self.tools.get(&self.general_tool) {
                    Some(general) => match general.call(query, self.result_count).await {
                        Ok(mut hits) => {
                            hits.truncate(self.result_count);
                            hits
                        }
                        Err(e) => {
                            error!(tool = %self.general_tool, error = %e, "Fallback search failed");
                            Vec::new()
                        }
                    },
                    None => Vec::new(),
                }
            }
            Err(e) => {
                error!(tool, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    /// Clear both caches.
    pub fn clear_caches(&self) {
        let url_entries = self.url_cache.len();
        let search_entries = self.search_cache.len();
        self.url_cache.clear();
        self.search_cache.clear();
        info!(url_entries, search_entries, "Caches cleared");
    }
}

/// Cache key: SHA-256 over `query_tool`, so arbitrarily long queries stay
/// fixed-width.
fn search_cache_key(query: &str, tool: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b"_");
    hasher.update(tool.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn truncate(s: &str) -> &str {
    let mut end = s.len().min(50);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// A scripted search tool with a call counter.
    struct MockTool {
        name: String,
        hits: Vec<SearchHit>,
        error: Option<SearchError>,
        configured: bool,
        calls: Mutex<usize>,
    }

    impl MockTool {
        fn returning(name: &str, hits: Vec<SearchHit>) -> Self {
            Self {
                name: name.into(),
                hits,
                error: None,
                configured: true,
                calls: Mutex::new(0),
            }
        }

        fn failing(name: &str, error: SearchError) -> Self {
            Self {
                name: name.into(),
                hits: vec![],
                error: Some(error),
                configured: true,
                calls: Mutex::new(0),
            }
        }

        fn unconfigured(name: &str) -> Self {
            Self {
                configured: false,
                ..Self::returning(name, vec![])
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl SearchTool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        async fn call(
            &self,
            _query: &str,
            count: usize,
        ) -> std::result::Result<Vec<SearchHit>, SearchError> {
            *self.calls.lock().unwrap() += 1;
            match &self.error {
                Some(e) => Err(e.clone()),
                None => Ok(self.hits.iter().take(count).cloned().collect()),
            }
        }

        fn credentials_configured(&self) -> bool {
            self.configured
        }
    }

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            url: url.into(),
            title: format!("title for {url}"),
            snippet: String::new(),
        }
    }

    fn access() -> ToolAccess {
        ToolAccess::new(100, Duration::from_secs(3600), 10)
    }

    #[tokio::test]
    async fn cache_hit_skips_second_invocation() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(brave.clone());

        let first = access.search_web("q", "brave").await;
        let second = access.search_web("q", "brave").await;

        assert_eq!(first, second);
        assert_eq!(brave.call_count(), 1);
    }

    #[tokio::test]
    async fn different_tools_cached_independently() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let duck = Arc::new(MockTool::returning("duckduckgo", vec![hit("https://b.example")]));
        let access = access().register(brave.clone()).register(duck.clone());

        access.search_web("q", "brave").await;
        access.search_web("q", "duckduckgo").await;

        assert_eq!(brave.call_count(), 1);
        assert_eq!(duck.call_count(), 1);
    }

    #[tokio::test]
    async fn tool_failure_becomes_empty_and_is_cached() {
        let brave = Arc::new(MockTool::failing(
            "brave",
            SearchError::RateLimited("slow down".into()),
        ));
        let access = access().register(brave.clone());

        assert!(access.search_web("q", "brave").await.is_empty());
        assert!(access.search_web("q", "brave").await.is_empty());
        // Second call served from cache — the failing tool is not hammered.
        assert_eq!(brave.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_returns_empty() {
        let access = access();
        assert!(access.search_web("q", "nonexistent").await.is_empty());
    }

    #[tokio::test]
    async fn not_implemented_falls_back_to_general() {
        let stub = Arc::new(MockTool::failing(
            "social",
            SearchError::NotImplemented("social".into()),
        ));
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(stub.clone()).register(brave.clone());

        let hits = access.search_web("q", "social").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(brave.call_count(), 1);
    }

    #[tokio::test]
    async fn fact_check_first_prefers_fact_tier() {
        let fact = Arc::new(MockTool::returning("factcheck", vec![hit("https://f.example")]));
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(fact.clone()).register(brave.clone());

        let budget = SearchBudget::unlimited();
        let hits = access
            .dispatch("q", SearchStrategy::FactCheckFirst, &budget)
            .await;

        assert_eq!(hits[0].url, "https://f.example");
        assert_eq!(brave.call_count(), 0);
    }

    #[tokio::test]
    async fn fact_check_first_falls_through_on_empty_tier() {
        let fact = Arc::new(MockTool::returning("factcheck", vec![]));
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(fact.clone()).register(brave.clone());

        let budget = SearchBudget::unlimited();
        let hits = access
            .dispatch("q", SearchStrategy::FactCheckFirst, &budget)
            .await;

        assert_eq!(hits[0].url, "https://a.example");
        assert_eq!(fact.call_count(), 1);
        assert_eq!(brave.call_count(), 1);
    }

    #[tokio::test]
    async fn fact_check_first_skips_unconfigured_tier() {
        let fact = Arc::new(MockTool::unconfigured("factcheck"));
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(fact.clone()).register(brave.clone());

        let budget = SearchBudget::unlimited();
        let hits = access
            .dispatch("q", SearchStrategy::FactCheckFirst, &budget)
            .await;

        assert_eq!(hits.len(), 1);
        assert_eq!(fact.call_count(), 0);
    }

    #[tokio::test]
    async fn deep_dive_unions_both_tools() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let duck = Arc::new(MockTool::returning("duckduckgo", vec![hit("https://b.example")]));
        let access = access().register(brave).register(duck);

        let budget = SearchBudget::unlimited();
        let hits = access
            .dispatch("q", SearchStrategy::WebDeepDive, &budget)
            .await;

        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn deep_dive_skips_second_tool_when_budget_spent() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let duck = Arc::new(MockTool::returning("duckduckgo", vec![hit("https://b.example")]));
        let access = access().register(brave).register(duck.clone());

        // One slot total: the caller already spent it before dispatch.
        let budget = SearchBudget::new(1);
        assert!(budget.try_acquire());

        let hits = access
            .dispatch("q", SearchStrategy::WebDeepDive, &budget)
            .await;

        assert_eq!(hits.len(), 1);
        assert_eq!(duck.call_count(), 0);
    }

    #[tokio::test]
    async fn institutional_uses_general_tool() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(brave.clone());

        let budget = SearchBudget::unlimited();
        let hits = access
            .dispatch("q", SearchStrategy::Institutional, &budget)
            .await;

        assert_eq!(hits.len(), 1);
        assert_eq!(brave.call_count(), 1);
    }

    #[tokio::test]
    async fn result_count_caps_hits() {
        let many: Vec<SearchHit> = (0..20).map(|i| hit(&format!("https://h{i}.example"))).collect();
        let brave = Arc::new(MockTool::returning("brave", many));
        let access = ToolAccess::new(100, Duration::from_secs(3600), 5).register(brave);

        let hits = access.search_web("q", "brave").await;
        assert_eq!(hits.len(), 5);
    }

    #[tokio::test]
    async fn clear_caches_forces_reinvocation() {
        let brave = Arc::new(MockTool::returning("brave", vec![hit("https://a.example")]));
        let access = access().register(brave.clone());

        access.search_web("q", "brave").await;
        access.clear_caches();
        access.search_web("q", "brave").await;

        assert_eq!(brave.call_count(), 2);
    }
}
