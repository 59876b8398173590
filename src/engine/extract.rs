//! Per-entry extraction of validated records from raw listing entries.

use crate::engine::{year, CitationExporter};
use crate::models::{RawResultEntry, Record};

/// Inline marker tag identifying a citation-only stub
pub const CITATION_MARKER: &str = "[CITATION]";

/// Whether an entry is a citation-only stub rather than an indexed listing.
///
/// Citation-only stubs represent references *to* a work found elsewhere;
/// counting them would silently inflate year counts, so extraction excludes
/// them entirely. Other markers ("[BOOK]", "[HTML]", ...) do not make an
/// entry citation-only.
pub fn is_citation_only(entry: &RawResultEntry) -> bool {
    entry
        .marker
        .as_deref()
        .map(|m| m.trim().eq_ignore_ascii_case(CITATION_MARKER))
        .unwrap_or(false)
}

/// Turns one page's raw listing entries into zero or more validated records.
///
/// When built with an exporter, extraction resolves a citation-format string
/// per record as a best-effort side channel; any failure there degrades the
/// record's citation field to empty and never aborts extraction.
#[derive(Default)]
pub struct RecordExtractor<'a> {
    exporter: Option<&'a dyn CitationExporter>,
}

impl<'a> RecordExtractor<'a> {
    /// Extractor without citation enrichment
    pub fn new() -> Self {
        Self { exporter: None }
    }

    /// Extractor that resolves citation text through `exporter`
    pub fn with_exporter(exporter: &'a dyn CitationExporter) -> Self {
        Self {
            exporter: Some(exporter),
        }
    }

    /// Extract records from one page's entries, in listing order.
    pub async fn extract(&self, entries: &[RawResultEntry]) -> Vec<Record> {
        let mut records = Vec::with_capacity(entries.len());

        for entry in entries {
            if is_citation_only(entry) {
                tracing::debug!(title = %entry.title_text, "skipping citation-only stub");
                continue;
            }

            // A title is the dedup key, so entries without one produce nothing
            if entry.title_text.trim().is_empty() {
                tracing::debug!("skipping entry with empty title");
                continue;
            }

            let year = year::normalize(&entry.meta_text);

            let citation = match self.exporter {
                Some(exporter) => exporter.export(entry).await.unwrap_or_default(),
                None => String::new(),
            };

            records.push(Record {
                title: entry.title_text.clone(),
                year,
                citation,
            });
        }

        records
    }
}
