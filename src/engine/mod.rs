//! Extraction and reconciliation engine.
//!
//! The engine walks a paginated result listing, turns raw listing entries
//! into validated [`Record`]s, merges new batches with previously persisted
//! datasets, and aggregates the merged dataset into per-year counts.
//!
//! The engine is deliberately sequential: one page fetch, one extraction
//! pass, and at most one citation-export fetch per record, in that order.
//! It never spawns tasks or joins futures concurrently; every await is a
//! direct continuation of the single logical thread of control.
//!
//! Collaborators are abstracted behind two traits so that the engine can be
//! driven by the live Google Scholar session or by scripted mocks:
//!
//! - [`SearchSession`]: page-fetch handle owned by the caller for one run
//! - [`CitationExporter`]: best-effort citation-format side channel

pub mod aggregate;
pub mod extract;
pub mod merge;
pub mod paginate;
pub mod year;

pub use aggregate::{count_by_year, YearCounts};
pub use extract::{is_citation_only, RecordExtractor, CITATION_MARKER};
pub use merge::{merge, near_duplicate_titles};
pub use paginate::{PaginationController, ScrapeError, ScrapeOutcome};

use async_trait::async_trait;

use crate::models::RawResultEntry;
use crate::sources::SourceError;

/// Page-fetch collaborator for one scraping run.
///
/// Implementations own the navigation state (current page, pending
/// "next page" control). The session handle is created by the caller and
/// scoped to a single run; the engine never retains it beyond that.
#[async_trait]
pub trait SearchSession: Send {
    /// Wait (bounded) for the current page's results to be present and
    /// return its listing entries.
    ///
    /// A page that loads with zero listing entries is a valid outcome and
    /// returns an empty vector; only an expired wait is an error.
    async fn load_entries(&mut self) -> Result<Vec<RawResultEntry>, SourceError>;

    /// Navigate to the next results page.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` when the listing has
    /// no "next page" control, which is the normal end of a scrape.
    async fn advance(&mut self) -> Result<bool, SourceError>;
}

/// Citation-export collaborator.
///
/// Absence, timeout, and parse failure are all valid non-error outcomes
/// expressed as `None`; the affected record's citation field degrades to
/// empty and extraction continues.
#[async_trait]
pub trait CitationExporter: Send + Sync {
    /// Resolve a raw citation-format string for one entry, best effort.
    async fn export(&self, entry: &RawResultEntry) -> Option<String>;
}
