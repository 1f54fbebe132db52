//! Claim extraction — distills raw text (or an article URL) into a single
//! verifiable assertion with entities and a category.

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use veritas_core::generator::{ChatMessage, Generator};
use veritas_core::{Claim, ClaimCategory, Entities, Error, SearchError};
use veritas_tools::ToolAccess;

/// Article text beyond this length is truncated before extraction.
const MAX_ARTICLE_CHARS: usize = 10_000;

const SYSTEM_PROMPT: &str = "You are an expert news analyst and fact-checker.\n\
     Extract a single, verifiable core claim from the provided text.\n\n\
     Instructions:\n\
     1. core_claim: the main factual assertion — one sentence, neutral in tone, verifiable. \
     If the text contains multiple claims, pick the most significant or controversial one.\n\
     2. entities: all relevant people, places, specific dates/years, and organizations.\n\
     3. category: one of politics, health, economy, science, or other.";

/// Distill a claim from raw text.
///
/// Degrades to a pass-through claim (core assertion = raw text) when the
/// generator fails, so a broken backend still yields a full debate rather
/// than no result.
pub async fn extract_claim(generator: &dyn Generator, text: &str) -> Claim {
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(text.to_string()),
    ];

    match generator.generate_json(&messages, &claim_schema()).await {
        Ok(value) => match serde_json::from_value::<ExtractedClaim>(value) {
            Ok(extracted) => {
                info!(
                    core_claim = %extracted.core_claim.chars().take(100).collect::<String>(),
                    category = %extracted.category,
                    entity_count = extracted.entities.count(),
                    "Claim extracted successfully"
                );
                Claim {
                    id: Uuid::new_v4(),
                    raw_input: text.to_string(),
                    core_claim: extracted.core_claim,
                    entities: extracted.entities,
                    category: extracted.category,
                }
            }
            Err(e) => {
                warn!(error = %e, "Extraction payload did not match schema, using raw input");
                Claim::from_raw(text)
            }
        },
        Err(e) => {
            error!(error = %e, "Error during claim extraction, using raw input");
            Claim::from_raw(text)
        }
    }
}

/// Distill a claim from an article URL: validate, fetch through the tool
/// access layer's url cache, then extract from title + body. The claim's
/// `raw_input` is set to the URL.
pub async fn claim_from_url(
    access: &ToolAccess,
    generator: &dyn Generator,
    url: &str,
) -> Result<Claim, Error> {
    if !validate_url(url) {
        return Err(SearchError::InvalidUrl(format!(
            "invalid URL format or protocol: {url}"
        ))
        .into());
    }

    let page = access
        .fetch_page(url, "extractor")
        .await
        .ok_or_else(|| SearchError::Network(format!("could not fetch content from {url}")))?;

    let mut full_text = format!("{}\n\n{}", page.title, page.text);
    if full_text.len() > MAX_ARTICLE_CHARS {
        let mut cut = MAX_ARTICLE_CHARS;
        while !full_text.is_char_boundary(cut) {
            cut -= 1;
        }
        full_text.truncate(cut);
    }

    info!(url, length = full_text.len(), "Extracted article text");

    let mut claim = extract_claim(generator, &full_text).await;
    claim.raw_input = url.to_string();
    Ok(claim)
}

/// URL must be http/https, carry a host, and stay a sane length.
pub fn validate_url(url: &str) -> bool {
    if url.len() >= 2048 {
        return false;
    }
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty()
}

#[derive(Deserialize)]
struct ExtractedClaim {
    core_claim: String,
    #[serde(default)]
    entities: Entities,
    #[serde(default)]
    category: ClaimCategory,
}

fn claim_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "core_claim": { "type": "string" },
            "entities": {
                "type": "object",
                "properties": {
                    "people": { "type": "array", "items": { "type": "string" } },
                    "places": { "type": "array", "items": { "type": "string" } },
                    "dates": { "type": "array", "items": { "type": "string" } },
                    "organizations": { "type": "array", "items": { "type": "string" } }
                }
            },
            "category": {
                "type": "string",
                "enum": ["politics", "health", "economy", "science", "other"]
            }
        },
        "required": ["core_claim"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn extraction_builds_structured_claim() {
        let generator = StaticGenerator::new("ignored").with_json(serde_json::json!({
            "core_claim": "Drug Y reduces mortality by 30%",
            "entities": {
                "people": [],
                "places": ["Italy"],
                "dates": ["2026"],
                "organizations": ["EMA"]
            },
            "category": "health"
        }));

        let claim = extract_claim(&generator, "Long article about drug Y…").await;

        assert_eq!(claim.core_claim, "Drug Y reduces mortality by 30%");
        assert_eq!(claim.category, ClaimCategory::Health);
        assert_eq!(claim.entities.organizations, vec!["EMA"]);
        assert_eq!(claim.raw_input, "Long article about drug Y…");
        assert!(!claim.needs_extraction());
    }

    #[tokio::test]
    async fn extraction_failure_degrades_to_raw_input() {
        let claim = extract_claim(&FailingGenerator, "Some claim text").await;
        assert_eq!(claim.core_claim, "Some claim text");
        assert!(claim.needs_extraction());
    }

    #[tokio::test]
    async fn malformed_payload_degrades_to_raw_input() {
        let generator =
            StaticGenerator::new("ignored").with_json(serde_json::json!({"wrong": "shape"}));
        let claim = extract_claim(&generator, "Some claim text").await;
        assert_eq!(claim.core_claim, "Some claim text");
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://example.com/article"));
        assert!(validate_url("http://example.com"));
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("https://"));
        assert!(!validate_url(&format!("https://e.com/{}", "x".repeat(3000))));
    }

    #[tokio::test]
    async fn bad_url_is_rejected() {
        let access = empty_tool_access();
        let result = claim_from_url(&access, &FailingGenerator, "not-a-url").await;
        assert!(result.is_err());
    }
}
