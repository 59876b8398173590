//! Reconciliation of scraped record batches across sessions.

use std::collections::HashSet;
use strsim::jaro_winkler;

use crate::models::Record;

/// Threshold above which two distinct titles are reported as near-duplicates
const NEAR_DUPLICATE_THRESHOLD: f64 = 0.95;

/// Merge a previously persisted dataset with a newly scraped batch,
/// deduplicating by exact, case-sensitive title match.
///
/// Previous records come first so that earlier provenance wins on conflict;
/// later duplicates are dropped, keeping the first occurrence. Relative
/// order among kept records follows first-occurrence order of the
/// concatenation. With an empty `previous`, the incoming batch is
/// deduplicated against itself.
///
/// The operation is pure and idempotent: merging the result with an empty
/// batch yields the same dataset.
pub fn merge(previous: Vec<Record>, incoming: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(previous.len() + incoming.len());

    for record in previous.into_iter().chain(incoming) {
        if seen.insert(record.title.clone()) {
            merged.push(record);
        } else {
            tracing::debug!(title = %record.title, "dropping duplicate title");
        }
    }

    merged
}

/// Find pairs of distinct titles that are likely the same work.
///
/// Exact duplicates are already resolved by [`merge`]; this reports
/// high-similarity leftovers (case-insensitive Jaro-Winkler >= 0.95) so a
/// user can inspect them. Purely advisory; nothing is dropped.
pub fn near_duplicate_titles(records: &[Record]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for (i, a) in records.iter().enumerate() {
        let title_a = a.title.to_lowercase();
        for b in records.iter().skip(i + 1) {
            let title_b = b.title.to_lowercase();
            if title_a == title_b {
                // Case-insensitive exact match still counts as "near"
                pairs.push((a.title.clone(), b.title.clone()));
                continue;
            }
            if jaro_winkler(&title_a, &title_b) >= NEAR_DUPLICATE_THRESHOLD {
                pairs.push((a.title.clone(), b.title.clone()));
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: &str) -> Record {
        Record::new(title, year)
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let previous = vec![record("X", "2018"), record("Y", "2019")];
        let incoming = vec![record("Y", "2019"), record("Z", "2020")];

        let merged = merge(previous, incoming);

        let got: Vec<(&str, &str)> = merged
            .iter()
            .map(|r| (r.title.as_str(), r.year.as_str()))
            .collect();
        assert_eq!(got, vec![("X", "2018"), ("Y", "2019"), ("Z", "2020")]);
    }

    #[test]
    fn test_first_occurrence_wins_on_conflicting_years() {
        let previous = vec![record("Y", "2019")];
        let incoming = vec![record("Y", "2021")];

        let merged = merge(previous, incoming);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].year, "2019");
    }

    #[test]
    fn test_internal_duplicates_in_both_inputs() {
        let previous = vec![record("A", "2018"), record("A", "2018")];
        let incoming = vec![record("B", "2019"), record("B", "2019"), record("A", "2020")];

        let merged = merge(previous, incoming);

        let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_no_previous_dedups_incoming() {
        let incoming = vec![record("A", "2019"), record("A", "2019"), record("B", "2020")];

        let merged = merge(Vec::new(), incoming);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let previous = vec![record("X", "2018"), record("Y", "2019")];
        let incoming = vec![record("Y", "2019"), record("Z", "2020")];

        let once = merge(previous, incoming);
        let twice = merge(once.clone(), Vec::new());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let merged = merge(
            vec![record("Deep Learning", "2015")],
            vec![record("deep learning", "2016")],
        );

        // Exact-match dedup keeps both; near-duplicate reporting flags them
        assert_eq!(merged.len(), 2);
        let pairs = near_duplicate_titles(&merged);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_near_duplicates_reported() {
        let records = vec![
            record("Knowledge Gap Identification in Neurosymbolic AI", "2022"),
            record("Knowledge Gap Identification in Neuro-symbolic AI", "2022"),
            record("An Entirely Different Paper", "2020"),
        ];

        let pairs = near_duplicate_titles(&records);

        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].0.starts_with("Knowledge Gap"));
    }
}
