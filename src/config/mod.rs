//! Configuration management.
//!
//! Settings load from an optional `scholar-harvest.toml` (current directory
//! or the user config directory) with `SCHOLAR_HARVEST_*` environment
//! variable overrides; CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file name searched for in the current directory
const CONFIG_FILE_NAME: &str = "scholar-harvest.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scrape run settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Output directory settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Citation-export side channel settings
    #[serde(default)]
    pub citations: CitationConfig,
}

/// Scrape run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Results page to start from (1-based)
    #[serde(default = "default_start_page")]
    pub start_page: usize,

    /// Bounded wait for a page's results container, in seconds
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Interval between polls while waiting for results, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            page_timeout_secs: default_page_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_start_page() -> usize {
    1
}

fn default_page_timeout() -> u64 {
    40
}

fn default_poll_interval() -> u64 {
    2000
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent override (defaults to `scholar-harvest/{version}`)
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// Output directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for dataset CSV files
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Directory for chart SVG files
    #[serde(default = "default_plots_dir")]
    pub plots_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            plots_dir: default_plots_dir(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results/csv")
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from("results/plots")
}

/// Citation-export side channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Whether to resolve citation text per record during extraction
    #[serde(default)]
    pub enabled: bool,

    /// Bounded wait for one citation-export fetch, in seconds
    #[serde(default = "default_citation_timeout")]
    pub timeout_secs: u64,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: default_citation_timeout(),
        }
    }
}

fn default_citation_timeout() -> u64 {
    10
}

/// Load configuration from a file with environment overrides.
///
/// Nested keys use a double-underscore separator so field names containing
/// underscores stay intact, e.g. `SCHOLAR_HARVEST_SCRAPE__START_PAGE`
/// overrides `scrape.start_page`.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(
            config::Environment::with_prefix("SCHOLAR_HARVEST")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = PathBuf::from(CONFIG_FILE_NAME);
    if cwd.exists() {
        return Some(cwd);
    }

    let user = dirs::config_dir()?
        .join("scholar-harvest")
        .join("config.toml");
    user.exists().then_some(user)
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.scrape.start_page, 1);
        assert_eq!(config.scrape.page_timeout_secs, 40);
        assert_eq!(config.scrape.poll_interval_ms, 2000);
        assert_eq!(config.http.request_timeout_secs, 30);
        assert!(!config.citations.enabled);
        assert_eq!(config.citations.timeout_secs, 10);
        assert_eq!(config.output.results_dir, PathBuf::from("results/csv"));
        assert_eq!(config.output.plots_dir, PathBuf::from("results/plots"));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar-harvest.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[scrape]\nstart_page = 3\n\n[citations]\nenabled = true"
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.scrape.start_page, 3);
        assert!(config.citations.enabled);
        // Untouched sections keep their defaults
        assert_eq!(config.scrape.page_timeout_secs, 40);
        assert_eq!(config.output.results_dir, PathBuf::from("results/csv"));
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar-harvest.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[scrape]\nstart_page = 3").unwrap();

        std::env::set_var("SCHOLAR_HARVEST_SCRAPE__PAGE_TIMEOUT_SECS", "75");
        let config = load_config(&path).unwrap();
        std::env::remove_var("SCHOLAR_HARVEST_SCRAPE__PAGE_TIMEOUT_SECS");

        // Env wins for its key; the file value elsewhere is untouched
        assert_eq!(config.scrape.page_timeout_secs, 75);
        assert_eq!(config.scrape.start_page, 3);
    }
}
