//! Core data models for scraped publication records.

mod record;

pub use record::{RawResultEntry, Record};
