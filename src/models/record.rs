//! Record model representing one scraped publication listing.

use serde::{Deserialize, Serialize};

use crate::engine::year::UNKNOWN_YEAR;

/// One raw listing item as exposed by a page-fetch collaborator.
///
/// An entry owns both its title and its byline/venue/year blob so that
/// extraction never has to align two separately collected element lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResultEntry {
    /// Title text of the listing, verbatim
    pub title_text: String,

    /// Byline blob (authors, venue, year) as one free-text string
    pub meta_text: String,

    /// Inline marker tag (e.g. "[CITATION]", "[BOOK]"), absent for plain listings
    pub marker: Option<String>,

    /// Opaque key used by the citation-export side channel, when the
    /// listing offers one
    pub citation_key: Option<String>,
}

impl RawResultEntry {
    /// Create a plain entry with title and meta text
    pub fn new(title_text: impl Into<String>, meta_text: impl Into<String>) -> Self {
        Self {
            title_text: title_text.into(),
            meta_text: meta_text.into(),
            marker: None,
            citation_key: None,
        }
    }

    /// Set the inline marker tag
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Set the citation-export key
    pub fn citation_key(mut self, key: impl Into<String>) -> Self {
        self.citation_key = Some(key.into());
        self
    }
}

/// One publication record: title, year label, and optional citation text.
///
/// The `year` field is either a 4-digit string or the `"Unknown"` sentinel.
/// No uniqueness is enforced at this level; deduplication by title happens
/// during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Publication title (non-empty; the dedup key)
    #[serde(rename = "Title")]
    pub title: String,

    /// Year label: 4-digit string or "Unknown"
    #[serde(rename = "Year")]
    pub year: String,

    /// Raw citation-format text, empty when not resolved.
    /// Never stored in the dataset CSV; persisted separately.
    #[serde(skip)]
    pub citation: String,
}

impl Record {
    /// Create a record without citation text
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            citation: String::new(),
        }
    }

    /// Create a record carrying citation text
    pub fn with_citation(
        title: impl Into<String>,
        year: impl Into<String>,
        citation: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            citation: citation.into(),
        }
    }

    /// Whether this record carries a real 4-digit year rather than the sentinel
    pub fn has_known_year(&self) -> bool {
        self.year != UNKNOWN_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = RawResultEntry::new("Paper A", "J Smith - Some Venue, 2019")
            .marker("[HTML]")
            .citation_key("abc123");

        assert_eq!(entry.title_text, "Paper A");
        assert_eq!(entry.meta_text, "J Smith - Some Venue, 2019");
        assert_eq!(entry.marker.as_deref(), Some("[HTML]"));
        assert_eq!(entry.citation_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_known_year() {
        assert!(Record::new("A", "2019").has_known_year());
        assert!(!Record::new("B", "Unknown").has_known_year());
    }

    #[test]
    fn test_record_with_citation() {
        let record = Record::with_citation("A", "2019", "Smith, J. (2019). A.");
        assert_eq!(record.citation, "Smith, J. (2019). A.");
    }
}
