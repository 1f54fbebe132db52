//! Google Programmable Search Engine tool, configured for fact-checking
//! sites. The first tier of the `FactCheckFirst` strategy.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use veritas_core::error::SearchError;
use veritas_core::search::{SearchHit, SearchTool};

const API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google PSE limits to 10 results per request.
const MAX_PSE_RESULTS: usize = 10;

/// Fact-check oriented search over a Google Programmable Search Engine.
pub struct FactCheckSearch {
    api_key: Option<String>,
    engine_id: Option<String>,
    client: reqwest::Client,
}

impl FactCheckSearch {
    pub fn new(
        api_key: Option<String>,
        engine_id: Option<String>,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            api_key,
            engine_id,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SearchTool for FactCheckSearch {
    fn name(&self) -> &str {
        "factcheck"
    }

    fn credentials_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }

    async fn call(
        &self,
        query: &str,
        count: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        let (Some(api_key), Some(engine_id)) = (&self.api_key, &self.engine_id) else {
            warn!("GOOGLE_PSE_API_KEY or GOOGLE_PSE_CX not configured, skipping fact-check search");
            return Ok(Vec::new());
        };

        debug!(query, count, "Fact-check search");

        let num = count.min(MAX_PSE_RESULTS).to_string();
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", engine_id.as_str()),
                ("q", query),
                ("num", &num),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        tool: "factcheck".into(),
                        timeout_secs: 0,
                    }
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(SearchError::RateLimited("Google PSE API".into()));
        }
        if status != 200 {
            return Err(SearchError::MalformedResponse {
                tool: "factcheck".into(),
                reason: format!("unexpected status {status}"),
            });
        }

        let body: PseResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::MalformedResponse {
                    tool: "factcheck".into(),
                    reason: e.to_string(),
                })?;

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                url: item.link,
                title: item.title,
                snippet: item.snippet.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct PseResponse {
    #[serde(default)]
    items: Vec<PseItem>,
}

#[derive(Deserialize)]
struct PseItem {
    link: String,
    title: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_return_empty() {
        let tool = FactCheckSearch::new(None, None, std::time::Duration::from_secs(1));
        assert!(tool.call("q", 5).await.unwrap().is_empty());
        assert!(!tool.credentials_configured());
    }

    #[test]
    fn partial_credentials_not_configured() {
        let tool = FactCheckSearch::new(
            Some("key".into()),
            None,
            std::time::Duration::from_secs(1),
        );
        assert!(!tool.credentials_configured());
    }

    #[test]
    fn response_parsing_tolerates_missing_items() {
        let parsed: PseResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.items.is_empty());

        let parsed: PseResponse = serde_json::from_value(serde_json::json!({
            "items": [{"link": "https://snopes.com/x", "title": "Checked"}]
        }))
        .unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].snippet, None);
    }
}
