//! Mock collaborators for testing the extraction pipeline.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::engine::{CitationExporter, SearchSession};
use crate::models::RawResultEntry;
use crate::sources::SourceError;

/// Scripted page-fetch session.
///
/// Pages and advance results are consumed in the order they were queued.
/// When the page script runs out, `load_entries` returns an empty page;
/// when the advance script runs out, `advance` reports no next page, so an
/// unscripted session terminates cleanly.
#[derive(Debug, Default)]
pub struct MockSession {
    pages: VecDeque<Result<Vec<RawResultEntry>, SourceError>>,
    advances: VecDeque<Result<bool, SourceError>>,
}

impl MockSession {
    /// Create an empty session (loads one empty page, then stops)
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page of entries
    pub fn with_page(mut self, entries: Vec<RawResultEntry>) -> Self {
        self.pages.push_back(Ok(entries));
        self
    }

    /// Queue a page-load failure
    pub fn with_page_error(mut self, error: SourceError) -> Self {
        self.pages.push_back(Err(error));
        self
    }

    /// Queue an advance outcome (`true` = next page exists)
    pub fn with_advance(mut self, has_next: bool) -> Self {
        self.advances.push_back(Ok(has_next));
        self
    }

    /// Queue a navigation failure
    pub fn with_advance_error(mut self, error: SourceError) -> Self {
        self.advances.push_back(Err(error));
        self
    }
}

#[async_trait]
impl SearchSession for MockSession {
    async fn load_entries(&mut self) -> Result<Vec<RawResultEntry>, SourceError> {
        self.pages.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn advance(&mut self) -> Result<bool, SourceError> {
        self.advances.pop_front().unwrap_or(Ok(false))
    }
}

/// Citation exporter keyed by citation key.
#[derive(Debug, Default)]
pub struct MockExporter {
    citations: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockExporter {
    /// Exporter that knows no citations
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a citation for a key
    pub fn with_citation(mut self, key: impl Into<String>, citation: impl Into<String>) -> Self {
        self.citations.insert(key.into(), citation.into());
        self
    }

    /// Keys the exporter was asked about, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CitationExporter for MockExporter {
    async fn export(&self, entry: &RawResultEntry) -> Option<String> {
        let key = entry.citation_key.as_deref()?;
        self.calls.lock().unwrap().push(key.to_string());
        self.citations.get(key).cloned()
    }
}

/// Helper to create a plain listing entry for tests.
pub fn entry(title: &str, meta: &str) -> RawResultEntry {
    RawResultEntry::new(title, meta)
}

/// Helper to create a citation-only stub for tests.
pub fn citation_stub(title: &str, meta: &str) -> RawResultEntry {
    RawResultEntry::new(title, meta).marker("[CITATION]")
}
