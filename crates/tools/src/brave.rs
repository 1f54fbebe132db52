//! Brave Search API tool.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use veritas_core::error::SearchError;
use veritas_core::search::{SearchHit, SearchTool};

const API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// General web search backed by the Brave Search API.
pub struct BraveSearch {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl BraveSearch {
    pub fn new(api_key: Option<String>, timeout: std::time::Duration) -> Self {
        Self {
            api_key,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SearchTool for BraveSearch {
    fn name(&self) -> &str {
        "brave"
    }

    fn credentials_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn call(
        &self,
        query: &str,
        count: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        let Some(api_key) = &self.api_key else {
            warn!("BRAVE_SEARCH_API_KEY not configured, skipping Brave search");
            return Ok(Vec::new());
        };

        debug!(query, count, "Brave search");

        let response = self
            .client
            .get(API_URL)
            .header("X-Subscription-Token", api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", &count.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        tool: "brave".into(),
                        timeout_secs: 0,
                    }
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(SearchError::RateLimited("Brave Search API".into()));
        }
        if status != 200 {
            return Err(SearchError::MalformedResponse {
                tool: "brave".into(),
                reason: format!("unexpected status {status}"),
            });
        }

        let body: BraveResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::MalformedResponse {
                    tool: "brave".into(),
                    reason: e.to_string(),
                })?;

        let hits = body
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                snippet: r.description.unwrap_or_default(),
            })
            .collect();

        Ok(hits)
    }
}

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    url: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
}
