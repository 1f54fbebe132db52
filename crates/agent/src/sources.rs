//! Source curation shared by the debating agents: URL deduplication,
//! reliability tiering, and prompt formatting.

use chrono::Utc;

use veritas_core::{AgentRole, DebateMessage, SearchHit, Source};
use veritas_tools::assess_reliability;

/// Turn raw search hits into curated sources for one agent: deduplicate by
/// URL (keeping first occurrence), assess reliability from the domain
/// allowlist, and truncate to the depth-appropriate cap.
pub fn curate_sources(hits: &[SearchHit], agent: AgentRole, cap: usize) -> Vec<Source> {
    let mut seen = std::collections::HashSet::new();
    let mut sources = Vec::new();

    for hit in hits {
        if hit.url.is_empty() || !seen.insert(hit.url.as_str()) {
            continue;
        }

        sources.push(Source {
            url: hit.url.clone(),
            title: hit.title.clone(),
            snippet: hit.snippet.clone(),
            reliability: assess_reliability(&hit.url),
            timestamp: Some(Utc::now()),
            agent: Some(agent),
            relevance_score: None,
        });

        if sources.len() == cap {
            break;
        }
    }

    sources
}

/// Format curated sources for a prompt.
pub fn format_sources(sources: &[Source]) -> String {
    if sources.is_empty() {
        return "(no sources available)".into();
    }
    sources
        .iter()
        .map(|s| format!("- [{}]({}): {}", s.title, s.url, s.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the transcript so far for a prompt.
pub fn format_history(messages: &[DebateMessage]) -> String {
    if messages.is_empty() {
        return "(no prior messages)".into();
    }
    messages
        .iter()
        .map(|m| format!("{}: {}", m.agent, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
