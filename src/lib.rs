//! # Scholar Harvest
//!
//! Scrapes paginated scholarly search results into a deduplicated dataset and
//! reports the per-year distribution of publications.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Record, RawResultEntry)
//! - [`engine`]: Extraction and reconciliation engine (pagination, year
//!   normalization, citation filtering, merge, aggregation)
//! - [`sources`]: Search connectors with extensible trait-based architecture
//! - [`store`]: CSV persistence for datasets and citation text
//! - [`report`]: Year-distribution report, SVG chart, and JSON output
//! - [`utils`]: HTTP client and other utilities
//! - [`config`]: Configuration management

pub mod config;
pub mod engine;
pub mod models;
pub mod report;
pub mod sources;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use engine::{count_by_year, merge, PaginationController, RecordExtractor, YearCounts};
pub use models::{RawResultEntry, Record};
pub use sources::{Connector, ConnectorRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
