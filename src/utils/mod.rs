//! Utility modules.
//!
//! - [`HttpClient`]: shared HTTP client with sensible defaults

mod http;

pub use http::HttpClient;
