//! Pagination controller driving traversal across result pages.

use crate::engine::{RecordExtractor, SearchSession};
use crate::models::{RawResultEntry, Record};
use crate::sources::SourceError;

/// Result of a completed scrape: the accumulated records plus how far the
/// traversal got.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Records in discovery order across pages; may contain duplicate
    /// titles until reconciled
    pub records: Vec<Record>,

    /// Number of pages that went through extraction
    pub pages_visited: usize,

    /// Page number the traversal ended on
    pub last_page: usize,
}

/// A page failed to load within the session's bounded wait.
///
/// Fatal to the run, but carries the records already accumulated from
/// earlier pages so the caller can decide whether a partial dataset is
/// acceptable.
#[derive(Debug, thiserror::Error)]
#[error("page {page} failed to load: {source}")]
pub struct ScrapeError {
    /// Page number that failed
    pub page: usize,

    /// Records accumulated before the failure
    pub partial: Vec<Record>,

    /// The underlying source error
    #[source]
    pub source: SourceError,
}

enum State {
    Fetching,
    Extracting(Vec<RawResultEntry>),
    Done,
}

/// Drives traversal across result pages, invoking the extractor per page.
///
/// The controller owns the in-progress record accumulator for the run's
/// duration; no other component retains a reference to it. A page-load
/// failure ends the run as an error; a missing "next page" control (or any
/// navigation error) is the normal termination path.
pub struct PaginationController<'a> {
    session: &'a mut dyn SearchSession,
    extractor: RecordExtractor<'a>,
    start_page: usize,
}

impl<'a> PaginationController<'a> {
    /// Create a controller over a caller-owned session, starting at page 1
    pub fn new(session: &'a mut dyn SearchSession, extractor: RecordExtractor<'a>) -> Self {
        Self {
            session,
            extractor,
            start_page: 1,
        }
    }

    /// Resume at an arbitrary page instead of page 1 (minimum 1).
    ///
    /// The session must have been positioned at the same page; the
    /// controller only uses this for page numbering in logs and errors.
    pub fn starting_at(mut self, page: usize) -> Self {
        self.start_page = page.max(1);
        self
    }

    /// Run the traversal to completion and return the accumulated records.
    pub async fn run(self) -> Result<ScrapeOutcome, ScrapeError> {
        let mut records: Vec<Record> = Vec::new();
        let mut page = self.start_page;
        let mut pages_visited = 0usize;
        let mut state = State::Fetching;

        loop {
            state = match state {
                State::Fetching => {
                    tracing::info!(page, "loading results page");
                    match self.session.load_entries().await {
                        Ok(entries) => State::Extracting(entries),
                        Err(source) => {
                            return Err(ScrapeError {
                                page,
                                partial: records,
                                source,
                            });
                        }
                    }
                }
                State::Extracting(entries) => {
                    // An empty page still goes through extraction; only the
                    // missing "next" control below terminates the scrape
                    let batch = self.extractor.extract(&entries).await;
                    tracing::info!(page, entries = entries.len(), records = batch.len(), "extracted page");
                    records.extend(batch);
                    pages_visited += 1;

                    match self.session.advance().await {
                        Ok(true) => {
                            page += 1;
                            State::Fetching
                        }
                        Ok(false) => {
                            tracing::info!(page, "no more pages");
                            State::Done
                        }
                        Err(err) => {
                            tracing::debug!(page, error = %err, "navigation failed, treating as end of results");
                            State::Done
                        }
                    }
                }
                State::Done => {
                    tracing::info!(
                        pages_visited,
                        last_page = page,
                        records = records.len(),
                        "scrape complete"
                    );
                    return Ok(ScrapeOutcome {
                        records,
                        pages_visited,
                        last_page: page,
                    });
                }
            };
        }
    }
}
