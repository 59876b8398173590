//! Placeholder connectors for sources without live scraping support.
//!
//! Each returns a small canned record set so the rest of the pipeline
//! (reconciliation, aggregation, reporting) can be exercised against a
//! source id before a real connector lands.

use async_trait::async_trait;

use crate::models::Record;
use crate::sources::{Connector, SourceError};

#[cfg(feature = "source-ieee_xplore")]
#[derive(Debug, Default, Clone)]
pub struct IeeeXploreConnector;

#[cfg(feature = "source-ieee_xplore")]
#[async_trait]
impl Connector for IeeeXploreConnector {
    fn id(&self) -> &str {
        "ieee_xplore"
    }

    fn name(&self) -> &str {
        "IEEE Xplore"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned IEEE Xplore results");
        Ok(vec![
            Record::new("Sample IEEE Paper 1", "2020"),
            Record::new("Sample IEEE Paper 2", "2019"),
        ])
    }
}

#[cfg(feature = "source-arxiv")]
#[derive(Debug, Default, Clone)]
pub struct ArxivConnector;

#[cfg(feature = "source-arxiv")]
#[async_trait]
impl Connector for ArxivConnector {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned arXiv results");
        Ok(vec![
            Record::new("Sample arXiv Preprint 1", "2021"),
            Record::new("Sample arXiv Preprint 2", "2022"),
        ])
    }
}

#[cfg(feature = "source-acm")]
#[derive(Debug, Default, Clone)]
pub struct AcmConnector;

#[cfg(feature = "source-acm")]
#[async_trait]
impl Connector for AcmConnector {
    fn id(&self) -> &str {
        "acm"
    }

    fn name(&self) -> &str {
        "ACM Digital Library"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned ACM results");
        Ok(vec![
            Record::new("Sample ACM Paper 1", "2018"),
            Record::new("Sample ACM Paper 2", "2021"),
        ])
    }
}

#[cfg(feature = "source-springer")]
#[derive(Debug, Default, Clone)]
pub struct SpringerConnector;

#[cfg(feature = "source-springer")]
#[async_trait]
impl Connector for SpringerConnector {
    fn id(&self) -> &str {
        "springer"
    }

    fn name(&self) -> &str {
        "Springer"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned Springer results");
        Ok(vec![
            Record::new("Sample Springer Paper 1", "2017"),
            Record::new("Sample Springer Paper 2", "2020"),
        ])
    }
}

#[cfg(feature = "source-semantic")]
#[derive(Debug, Default, Clone)]
pub struct SemanticScholarConnector;

#[cfg(feature = "source-semantic")]
#[async_trait]
impl Connector for SemanticScholarConnector {
    fn id(&self) -> &str {
        "semantic"
    }

    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned Semantic Scholar results");
        Ok(vec![
            Record::new("Sample Semantic Scholar Paper 1", "2019"),
            Record::new("Sample Semantic Scholar Paper 2", "2023"),
        ])
    }
}

#[cfg(feature = "source-pubmed")]
#[derive(Debug, Default, Clone)]
pub struct PubMedConnector;

#[cfg(feature = "source-pubmed")]
#[async_trait]
impl Connector for PubMedConnector {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        tracing::debug!(query, "returning canned PubMed results");
        Ok(vec![
            Record::new("Sample PubMed Paper 1", "2016"),
            Record::new("Sample PubMed Paper 2", "2022"),
        ])
    }
}
