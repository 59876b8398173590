//! Year normalization for free-text byline/venue strings.

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel year label for entries with no recognizable publication year
pub const UNKNOWN_YEAR: &str = "Unknown";

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(19|20)\d{2}").expect("year pattern is valid"))
}

/// Extract a canonical 4-digit year from free text.
///
/// Returns the first left-to-right substring matching `(19|20)\d{2}`, or
/// [`UNKNOWN_YEAR`] when no such substring exists. Garbled input is not an
/// error; it simply yields the sentinel.
pub fn normalize(text: &str) -> String {
    match year_pattern().find(text) {
        Some(m) => m.as_str().to_string(),
        None => UNKNOWN_YEAR.to_string(),
    }
}
