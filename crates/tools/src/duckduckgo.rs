//! DuckDuckGo HTML search tool.
//!
//! Scrapes the no-JavaScript HTML endpoint. Needs no API key, which makes
//! it the second, independent tier for deep-dive searches.

use async_trait::async_trait;
use tracing::debug;

use veritas_core::error::SearchError;
use veritas_core::search::{SearchHit, SearchTool};

const HTML_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Keyless web search over DuckDuckGo's HTML endpoint.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SearchTool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn call(
        &self,
        query: &str,
        count: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        debug!(query, count, "DuckDuckGo search");

        let response = self
            .client
            .get(HTML_URL)
            .header("User-Agent", USER_AGENT)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        tool: "duckduckgo".into(),
                        timeout_secs: 0,
                    }
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(SearchError::RateLimited("DuckDuckGo".into()));
        }
        if status != 200 {
            return Err(SearchError::MalformedResponse {
                tool: "duckduckgo".into(),
                reason: format!("unexpected status {status}"),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::MalformedResponse {
                tool: "duckduckgo".into(),
                reason: e.to_string(),
            })?;

        Ok(extract_results(&html, count))
    }
}

/// Pull `{url, title, snippet}` triples out of the result markup.
///
/// The endpoint wraps each hit in `result__a` / `result__snippet` anchors;
/// links are redirect URLs carrying the target in a `uddg` parameter.
fn extract_results(html: &str, count: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let mut cursor = 0;

    while hits.len() < count {
        let Some(anchor_pos) = html[cursor..].find("class=\"result__a\"") else {
            break;
        };
        let block_start = cursor + anchor_pos;

        // href sits in the same tag, before or after the class attribute
        let tag_start = html[..block_start].rfind("<a").unwrap_or(block_start);
        let tag_end = match html[tag_start..].find('>') {
            Some(p) => tag_start + p,
            None => break,
        };
        let tag = &html[tag_start..tag_end];

        let url = attr_value(tag, "href").map(resolve_redirect).unwrap_or_default();

        let title_end = html[tag_end..].find("</a>").map(|p| tag_end + p);
        let title = title_end
            .map(|end| strip_tags(&html[tag_end + 1..end]))
            .unwrap_or_default();

        let snippet = html[tag_end..]
            .find("result__snippet")
            .and_then(|p| {
                let s = tag_end + p;
                let open = html[s..].find('>').map(|q| s + q + 1)?;
                let close = html[open..].find("</a>").or_else(|| html[open..].find("</div>"))?;
                Some(strip_tags(&html[open..open + close]))
            })
            .unwrap_or_default();

        if !url.is_empty() && !title.is_empty() {
            hits.push(SearchHit { url, title, snippet });
        }

        cursor = tag_end + 1;
    }

    hits
}

/// Extract an attribute value from a tag string.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let pos = tag.find(&format!("{name}=\""))?;
    let start = pos + name.len() + 2;
    let end = tag[start..].find('"')?;
    Some(&tag[start..start + end])
}

/// DuckDuckGo links point at a redirect with the real target in `uddg=`.
fn resolve_redirect(href: &str) -> String {
    match href.find("uddg=") {
        Some(pos) => {
            let encoded = &href[pos + 5..];
            let encoded = encoded.split('&').next().unwrap_or(encoded);
            percent_decode(encoded)
        }
        None => href.to_string(),
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Drop markup, keeping text content.
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
