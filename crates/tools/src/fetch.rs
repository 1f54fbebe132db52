//! HTTP page fetcher with a title/paragraph extraction heuristic.

use async_trait::async_trait;
use tracing::debug;

use veritas_core::error::SearchError;
use veritas_core::search::{PageContent, PageFetcher};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; veritas/0.1)";

/// Fetches a page over HTTP and reduces it to title + paragraph text.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
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
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<PageContent, SearchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SearchError::InvalidUrl(url.into()));
        }

        debug!(url, "Fetching page");

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        tool: "fetch".into(),
                        timeout_secs: 0,
                    }
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SearchError::MalformedResponse {
                tool: "fetch".into(),
                reason: format!("unexpected status {status}"),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::MalformedResponse {
                tool: "fetch".into(),
                reason: e.to_string(),
            })?;

        Ok(reduce_html(&html))
    }
}

/// Reduce an HTML document to its title and paragraph text.
pub fn reduce_html(html: &str) -> PageContent {
    let title = between(html, "<title", "</title>")
        .map(|t| {
            // Skip past the tag's own closing bracket
            let t = t.split_once('>').map(|(_, rest)| rest).unwrap_or(t);
            decode_entities(t.trim())
        })
        .unwrap_or_default();

    let mut paragraphs = Vec::new();
    let mut cursor = 0;
    while let Some(open) = html[cursor..].find("<p") {
        let start = cursor + open;
        let Some(content_start) = html[start..].find('>').map(|p| start + p + 1) else {
            break;
        };
        let Some(close) = html[content_start..].find("</p>") else {
            break;
        };
        let text = strip_tags(&html[content_start..content_start + close]);
        if !text.is_empty() {
            paragraphs.push(decode_entities(&text));
        }
        cursor = content_start + close + 4;
    }

    PageContent {
        title,
        text: paragraphs.join("\n"),
    }
}

fn between<'a>(haystack: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = haystack.find(open)?;
    let end = haystack[start..].find(close)? + start;
    Some(&haystack[start + open.len()..end])
}

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

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_title_and_paragraphs() {
        let html = r#"
            <html><head><title>Breaking News &amp; Updates</title></head>
            <body>
              <p>First <b>paragraph</b> of the article.</p>
              <nav><p></p></nav>
              <p class="lead">Second paragraph.</p>
            </body></html>
        "#;
        let content = reduce_html(html);
        assert_eq!(content.title, "Breaking News & Updates");
        assert_eq!(
            content.text,
            "First paragraph of the article.\nSecond paragraph."
        );
    }

    #[test]
    fn missing_title_is_empty() {
        let content = reduce_html("<p>body only</p>");
        assert_eq!(content.title, "");
        assert_eq!(content.text, "body only");
    }

    #[tokio::test]
    async fn non_http_url_rejected() {
        let fetcher = HttpPageFetcher::new(std::time::Duration::from_secs(1));
        let err = fetcher.fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidUrl(_)));
    }
}
