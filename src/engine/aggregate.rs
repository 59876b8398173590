//! Aggregation of record sets into per-year publication counts.

use std::collections::BTreeMap;

use crate::engine::year::UNKNOWN_YEAR;
use crate::models::Record;

/// Per-year publication counts derived from a record set.
///
/// Always recomputed from a dataset via [`count_by_year`], never mutated in
/// place. Known years iterate in ascending order; the `"Unknown"` bucket is
/// kept separate and never interleaved numerically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearCounts {
    years: BTreeMap<String, usize>,
    unknown: usize,
}

impl YearCounts {
    /// Count for one 4-digit year label (0 when absent)
    pub fn get(&self, year: &str) -> usize {
        if year == UNKNOWN_YEAR {
            return self.unknown;
        }
        self.years.get(year).copied().unwrap_or(0)
    }

    /// Count of records with no recognizable year
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    /// Sum of all counts, equal to the length of the source dataset
    pub fn total(&self) -> usize {
        self.years.values().sum::<usize>() + self.unknown
    }

    /// Known-year buckets in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.years.iter().map(|(year, count)| (year.as_str(), *count))
    }

    /// Largest single known-year count (0 when there are none)
    pub fn max_count(&self) -> usize {
        self.years.values().copied().max().unwrap_or(0)
    }

    /// Whether there are no counted records at all
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.unknown == 0
    }

    /// JSON view: label-to-count map (including `"Unknown"`) plus the total
    pub fn to_json(&self) -> serde_json::Value {
        let mut counts = serde_json::Map::new();
        for (year, count) in self.iter() {
            counts.insert(year.to_string(), serde_json::json!(count));
        }
        if self.unknown > 0 {
            counts.insert(UNKNOWN_YEAR.to_string(), serde_json::json!(self.unknown));
        }
        serde_json::json!({
            "counts": counts,
            "total": self.total(),
        })
    }
}

/// Count occurrences of each record's year label.
pub fn count_by_year(dataset: &[Record]) -> YearCounts {
    let mut counts = YearCounts::default();

    for record in dataset {
        if record.year == UNKNOWN_YEAR {
            counts.unknown += 1;
        } else {
            *counts.years.entry(record.year.clone()).or_insert(0) += 1;
        }
    }

    counts
}
