//! Search and page-fetch traits — the abstraction over external tools.
//!
//! Each named search backend implements [`SearchTool`]. The tool access
//! layer owns a registry of them and serves agents through its caches and
//! tiered dispatch strategies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A raw search result, before `Source` construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// A named external search capability.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// The unique tool name (e.g., "brave", "duckduckgo", "factcheck").
    fn name(&self) -> &str;

    /// Run the query and return up to `count` hits.
    async fn call(
        &self,
        query: &str,
        count: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError>;

    /// Whether the credentials this tool needs are configured.
    ///
    /// Tiered strategies skip a tier whose credentials are missing.
    fn credentials_configured(&self) -> bool {
        true
    }
}

/// Fetched page content, reduced to what claim extraction needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub text: String,
}

/// Fetches and reduces a web page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<PageContent, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTool;

    #[async_trait]
    impl SearchTool for StaticTool {
        fn name(&self) -> &str {
            "static"
        }

        async fn call(
            &self,
            query: &str,
            count: usize,
        ) -> std::result::Result<Vec<SearchHit>, SearchError> {
            Ok((0..count)
                .map(|i| SearchHit {
                    url: format!("https://example.com/{i}"),
                    title: format!("Result {i} for {query}"),
                    snippet: String::new(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn tool_returns_requested_count() {
        let tool = StaticTool;
        let hits = tool.call("test", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert!(tool.credentials_configured());
    }
}
