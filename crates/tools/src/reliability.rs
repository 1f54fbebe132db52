//! Source reliability assessment from a known-domain allowlist.
//!
//! Fact-check organizations, wire agencies, major newspapers, and
//! governmental/institutional domains rate high; any other https source
//! rates medium; everything else low.

use veritas_core::Reliability;

/// Domains whose content is treated as high reliability. Matching is by
/// suffix, so subdomains qualify.
const HIGH_RELIABILITY_DOMAINS: &[&str] = &[
    // Fact-checking organizations
    "snopes.com",
    "factcheck.org",
    "politifact.com",
    "fullfact.org",
    "bufale.net",
    // Wire agencies and major international news
    "reuters.com",
    "apnews.com",
    "afp.com",
    "bbc.com",
    "nytimes.com",
    "wsj.com",
    "theguardian.com",
    "lemonde.fr",
    "elpais.com",
    // Major Italian news
    "ansa.it",
    "corriere.it",
    "repubblica.it",
    "lastampa.it",
    "ilsole24ore.com",
    // Government and institutions
    "europa.eu",
    "istat.it",
    "gov.it",
    "salute.gov.it",
    "protezionecivile.gov.it",
];

/// Assess the reliability tier of a source URL.
pub fn assess_reliability(url: &str) -> Reliability {
    let Some(host) = host_of(url) else {
        return Reliability::Low;
    };

    if HIGH_RELIABILITY_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    {
        return Reliability::High;
    }

    if url.starts_with("https://") {
        Reliability::Medium
    } else {
        Reliability::Low
    }
}

/// Extract the host from an http(s) URL without pulling in a URL parser.
pub fn host_of(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    // Strip credentials and port
    let host = host.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() { None } else { Some(host) }
}
