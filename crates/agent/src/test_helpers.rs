//! Shared test helpers: scripted generators and search tools with call
//! counters. Used by this crate's tests and by the workflow integration
//! tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use veritas_core::error::{GeneratorError, SearchError};
use veritas_core::generator::{ChatMessage, Generator};
use veritas_core::search::{SearchHit, SearchTool};
use veritas_tools::ToolAccess;

/// A generator that always returns the same text, with a call counter.
/// `with_json` adds a fixed structured-output payload.
pub struct StaticGenerator {
    text: String,
    json: Option<serde_json::Value>,
    calls: Mutex<usize>,
}

impl StaticGenerator {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            json: None,
            calls: Mutex::new(0),
        }
    }

    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.json = Some(value);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Generator for StaticGenerator {
    fn name(&self) -> &str {
        "static_mock"
    }

    async fn generate(
        &self,
        _messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.text.clone())
    }

    async fn generate_json(
        &self,
        messages: &[ChatMessage],
        _schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GeneratorError> {
        *self.calls.lock().unwrap() += 1;
        match &self.json {
            Some(value) => Ok(value.clone()),
            None => veritas_core::extract_json(&self.text).ok_or_else(|| {
                GeneratorError::MalformedOutput("no JSON in scripted text".into())
            }),
        }
    }
}

/// A generator that returns a sequence of scripted responses.
///
/// Each call returns the next response in the queue. Panics if more calls
/// are made than responses provided.
pub struct SequentialGenerator {
    responses: Mutex<Vec<String>>,
    calls: Mutex<usize>,
}

impl SequentialGenerator {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Generator for SequentialGenerator {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn generate(
        &self,
        _messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        let mut count = self.calls.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if *count >= responses.len() {
            panic!(
                "SequentialGenerator: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }
        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

/// A generator whose every call fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn generate(
        &self,
        _messages: &[ChatMessage],
    ) -> std::result::Result<String, GeneratorError> {
        Err(GeneratorError::Network("scripted failure".into()))
    }
}

/// A search tool returning fixed hits, with a call counter.
pub struct CountingSearchTool {
    name: String,
    hits: Vec<SearchHit>,
    calls: Mutex<usize>,
}

impl CountingSearchTool {
    pub fn new(name: &str, urls: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            hits: urls
                .into_iter()
                .map(|url| SearchHit {
                    url: url.into(),
                    title: format!("title for {url}"),
                    snippet: "snippet".into(),
                })
                .collect(),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SearchTool for CountingSearchTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(
        &self,
        _query: &str,
        count: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.hits.iter().take(count).cloned().collect())
    }
}

/// A tool access layer with no registered tools: every search is empty.
pub fn empty_tool_access() -> ToolAccess {
    ToolAccess::new(100, Duration::from_secs(3600), 10)
}

/// A tool access layer whose general tool ("brave") returns the given URLs.
/// Returns the layer and the counting tool for call assertions.
pub fn tool_access_with_hits(urls: Vec<&str>) -> (ToolAccess, Arc<CountingSearchTool>) {
    let brave = Arc::new(CountingSearchTool::new("brave", urls.clone()));
    let duck = Arc::new(CountingSearchTool::new("duckduckgo", urls));
    let access = empty_tool_access()
        .register(brave.clone())
        .register(duck);
    (access, brave)
}
