//! Registry for managing search connectors.

use std::collections::HashMap;
use std::sync::Arc;

use super::{scholar::ScholarConnector, Connector, SourceError};

bitflags::bitflags! {
    /// Capabilities that a connector can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConnectorCapabilities: u32 {
        const SEARCH = 1 << 0;
        const PAGINATION = 1 << 1;
        const CITATIONS = 1 << 2;
    }
}

/// Registry for all available search connectors
///
/// The ConnectorRegistry manages all available connectors and provides
/// methods to query and use them.
#[derive(Debug, Clone)]
pub struct ConnectorRegistry {
    connectors: HashMap<String, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// Create a new registry with all available connectors
    pub fn new() -> Self {
        let mut registry = Self {
            connectors: HashMap::new(),
        };

        registry.register(Arc::new(ScholarConnector::new()));

        #[cfg(feature = "source-ieee_xplore")]
        registry.register(Arc::new(super::canned::IeeeXploreConnector));
        #[cfg(feature = "source-arxiv")]
        registry.register(Arc::new(super::canned::ArxivConnector));
        #[cfg(feature = "source-acm")]
        registry.register(Arc::new(super::canned::AcmConnector));
        #[cfg(feature = "source-springer")]
        registry.register(Arc::new(super::canned::SpringerConnector));
        #[cfg(feature = "source-semantic")]
        registry.register(Arc::new(super::canned::SemanticScholarConnector));
        #[cfg(feature = "source-pubmed")]
        registry.register(Arc::new(super::canned::PubMedConnector));

        registry
    }

    /// Register a new connector
    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        self.connectors.insert(connector.id().to_string(), connector);
    }

    /// Get a connector by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Connector>> {
        self.connectors.get(id)
    }

    /// Get a connector by ID, returning an error if not found
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn Connector>, SourceError> {
        self.get(id)
            .ok_or_else(|| SourceError::NotFound(format!("Source '{}' not found", id)))
    }

    /// Get all registered connectors
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Connector>> {
        self.connectors.values()
    }

    /// Get all connector IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.connectors.keys().map(|s| s.as_str())
    }

    /// Get connectors that support a specific capability
    pub fn with_capability(&self, capability: ConnectorCapabilities) -> Vec<&Arc<dyn Connector>> {
        self.all()
            .filter(|c| c.capabilities().contains(capability))
            .collect()
    }

    /// Check if a connector exists
    pub fn has(&self, id: &str) -> bool {
        self.connectors.contains_key(id)
    }

    /// Get the number of registered connectors
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_connector_count() -> usize {
        // Scholar is always compiled in
        let mut count = 1;

        if cfg!(feature = "source-ieee_xplore") {
            count += 1;
        }
        if cfg!(feature = "source-arxiv") {
            count += 1;
        }
        if cfg!(feature = "source-acm") {
            count += 1;
        }
        if cfg!(feature = "source-springer") {
            count += 1;
        }
        if cfg!(feature = "source-semantic") {
            count += 1;
        }
        if cfg!(feature = "source-pubmed") {
            count += 1;
        }

        count
    }

    #[test]
    fn test_registry_basic() {
        let registry = ConnectorRegistry::new();

        assert_eq!(registry.len(), expected_connector_count());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_connector() {
        let registry = ConnectorRegistry::new();

        let scholar = registry.get("scholar");
        assert!(scholar.is_some());
        assert_eq!(scholar.unwrap().id(), "scholar");

        let missing = registry.get("nonexistent");
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_required_missing() {
        let registry = ConnectorRegistry::new();

        let err = registry.get_required("nonexistent").unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_capabilities() {
        let registry = ConnectorRegistry::new();

        // Scholar supports the full pipeline
        let scholar = registry.get("scholar").unwrap();
        assert!(scholar.supports_search());
        assert!(scholar.supports_pagination());
        assert!(scholar.supports_citations());

        // Placeholders only support one-shot search
        #[cfg(feature = "source-ieee_xplore")]
        {
            let ieee = registry.get("ieee_xplore").unwrap();
            assert!(ieee.supports_search());
            assert!(!ieee.supports_pagination());
            assert!(!ieee.supports_citations());
        }
    }

    #[test]
    fn test_searchable_connectors() {
        let registry = ConnectorRegistry::new();

        let searchable = registry.with_capability(ConnectorCapabilities::SEARCH);
        assert_eq!(searchable.len(), expected_connector_count());
    }
}
