//! Search connectors with extensible trait-based architecture.
//!
//! This module defines the [`Connector`] trait that all search backends
//! implement. New backends can be added by implementing this trait and
//! registering them with the [`ConnectorRegistry`].
//!
//! The live Google Scholar connector (see [`scholar`]) is always compiled
//! in; the placeholder connectors can be disabled at compile time using
//! Cargo features:
//!
//! - `ieee_xplore` - Enable IEEE Xplore placeholder (default: enabled)
//! - `arxiv` - Enable arXiv placeholder (default: enabled)
//! - `acm` - Enable ACM Digital Library placeholder (default: enabled)
//! - `springer` - Enable Springer placeholder (default: enabled)
//! - `semantic` - Enable Semantic Scholar placeholder (default: enabled)
//! - `pubmed` - Enable PubMed placeholder (default: enabled)
//!
//! The `placeholders` feature group enables all of them at once.

#[cfg(any(
    feature = "source-ieee_xplore",
    feature = "source-arxiv",
    feature = "source-acm",
    feature = "source-springer",
    feature = "source-semantic",
    feature = "source-pubmed"
))]
mod canned;
mod registry;
pub mod scholar;

pub mod mock;

pub use registry::{ConnectorCapabilities, ConnectorRegistry};
pub use scholar::{ScholarCitationExporter, ScholarConnector, ScholarSession};

use crate::models::Record;
use async_trait::async_trait;

/// The Connector trait defines the interface for all search backends.
///
/// # Implementing a New Connector
///
/// To add a new search backend:
///
/// 1. Create a new struct that implements `Connector`
/// 2. Implement `id`, `name`, and `search`
/// 3. Override `capabilities` if the backend supports more than search
/// 4. Add the connector to `ConnectorRegistry::new()` or register it dynamically
#[async_trait]
pub trait Connector: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this connector (e.g., "scholar", "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this connector
    fn name(&self) -> &str;

    /// Describe the capabilities of this connector
    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities::SEARCH
    }

    /// Whether this connector supports search
    fn supports_search(&self) -> bool {
        self.capabilities().contains(ConnectorCapabilities::SEARCH)
    }

    /// Whether this connector supports paginated result traversal
    fn supports_pagination(&self) -> bool {
        self.capabilities()
            .contains(ConnectorCapabilities::PAGINATION)
    }

    /// Whether this connector supports citation-format export
    fn supports_citations(&self) -> bool {
        self.capabilities()
            .contains(ConnectorCapabilities::CITATIONS)
    }

    /// Search for publication records matching the query
    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The results container did not appear within the bounded wait
    #[error("results did not load within {0} seconds")]
    PageLoadTimeout(u64),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (HTML, URL, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connector or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::Parse(format!("URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_capabilities() {
        let caps = ConnectorCapabilities::SEARCH | ConnectorCapabilities::PAGINATION;

        assert!(caps.contains(ConnectorCapabilities::SEARCH));
        assert!(caps.contains(ConnectorCapabilities::PAGINATION));
        assert!(!caps.contains(ConnectorCapabilities::CITATIONS));
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::PageLoadTimeout(40);
        assert_eq!(err.to_string(), "results did not load within 40 seconds");
    }
}
