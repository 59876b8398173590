//! Google Scholar live source: paginated session, citation exporter, and
//! one-shot connector.
//!
//! Google Scholar has no official public API. This implementation scrapes
//! the HTML result listing, which may violate Google's Terms of Service.
//! Use at your own risk; it is primarily intended for research purposes.
//!
//! The result listing is anti-automation-hardened: interstitial pages and
//! slow renders are common. [`ScholarSession::load_entries`] absorbs those
//! by polling the page until the results container is present or the
//! bounded wait expires.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

use crate::engine::{CitationExporter, RecordExtractor, SearchSession};
use crate::models::{RawResultEntry, Record};
use crate::sources::{Connector, ConnectorCapabilities, SourceError};
use crate::utils::HttpClient;

/// Google Scholar endpoint
pub const SCHOLAR_BASE_URL: &str = "https://scholar.google.com";

/// Results per listing page, fixed by the site
const RESULTS_PER_PAGE: usize = 10;

/// Scholar serves an interstitial to obvious bots; a browser User-Agent
/// keeps the plain listing coming back
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default bounded wait for a page's results container
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(40);

/// Default interval between polls while waiting for results
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default bounded wait for one citation-export fetch
pub const DEFAULT_CITATION_TIMEOUT: Duration = Duration::from_secs(10);

/// One parsed results page
struct ParsedPage {
    entries: Vec<RawResultEntry>,
    next_href: Option<String>,
}

/// Collect an element's text with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one results page.
///
/// Returns `None` when the results container is absent, which means the
/// page has not rendered yet (or an interstitial was served) and the caller
/// should keep waiting.
fn parse_results_page(html: &str) -> Option<ParsedPage> {
    let document = Html::parse_document(html);

    let container_selector = Selector::parse("#gs_res_ccl_mid").ok()?;
    document.select(&container_selector).next()?;

    let block_selector = Selector::parse("div.gs_r.gs_or.gs_scl").ok()?;
    let title_selector = Selector::parse(".gs_rt").ok()?;
    let title_link_selector = Selector::parse(".gs_rt a").ok()?;
    let meta_selector = Selector::parse("div.gs_a").ok()?;
    let marker_selector = Selector::parse("span.gs_ct1").ok()?;

    let mut entries = Vec::new();

    for block in document.select(&block_selector) {
        let marker = block
            .select(&marker_selector)
            .next()
            .map(element_text)
            .filter(|m| !m.is_empty());

        // Linked listings put the title in the anchor; unlinked ones (e.g.
        // citation stubs) only have the full .gs_rt text, which carries the
        // marker tag as a prefix
        let title_text = match block.select(&title_link_selector).next() {
            Some(anchor) => element_text(anchor),
            None => {
                let full = block
                    .select(&title_selector)
                    .next()
                    .map(element_text)
                    .unwrap_or_default();
                match &marker {
                    Some(m) => full.trim_start_matches(m.as_str()).trim().to_string(),
                    None => full,
                }
            }
        };

        let meta_text = block
            .select(&meta_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut entry = RawResultEntry::new(title_text, meta_text);
        entry.marker = marker;
        entry.citation_key = block.value().attr("data-cid").map(|s| s.to_string());

        entries.push(entry);
    }

    let next_href = find_next_href(&document);

    Some(ParsedPage { entries, next_href })
}

/// Find the footer's next-page link, if any
fn find_next_href(document: &Html) -> Option<String> {
    let nav_selector = Selector::parse("#gs_n a").ok()?;

    document
        .select(&nav_selector)
        .find(|anchor| element_text(*anchor).contains("Next"))
        .and_then(|anchor| anchor.value().attr("href"))
        .map(|href| href.to_string())
}

/// Extract the first citation block from the citation popup
fn parse_citation_popup(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let citation_selector = Selector::parse(".gs_citr").ok()?;

    document
        .select(&citation_selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Caller-owned page-fetch handle over the Google Scholar listing.
///
/// A session is scoped to one scraping run: it holds the current page URL
/// and the pending next-page link, and is handed to
/// [`PaginationController`](crate::engine::PaginationController) by the caller.
#[derive(Debug)]
pub struct ScholarSession {
    client: HttpClient,
    current_url: Url,
    page: usize,
    next_href: Option<String>,
    page_timeout: Duration,
    poll_interval: Duration,
}

impl ScholarSession {
    /// Open a session against scholar.google.com, positioned at `start_page`
    pub fn new(
        client: HttpClient,
        query: &str,
        start_page: usize,
        page_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(
            SCHOLAR_BASE_URL,
            client,
            query,
            start_page,
            page_timeout,
            poll_interval,
        )
    }

    /// Open a session against an alternate base URL (mirrors, tests)
    pub fn with_base_url(
        base_url: &str,
        client: HttpClient,
        query: &str,
        start_page: usize,
        page_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidRequest("empty query".to_string()));
        }

        let page = start_page.max(1);
        let url = format!(
            "{}/scholar?hl=en&q={}&start={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            (page - 1) * RESULTS_PER_PAGE
        );

        Ok(Self {
            client,
            current_url: Url::parse(&url)?,
            page,
            next_href: None,
            page_timeout,
            poll_interval,
        })
    }

    /// Page number the session is currently positioned at
    pub fn page(&self) -> usize {
        self.page
    }

    async fn fetch_current(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .get(self.current_url.as_str())
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "Google Scholar returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl SearchSession for ScholarSession {
    /// Poll the current page until the results container is present or the
    /// bounded wait expires. Transient fetch errors and interstitial pages
    /// are absorbed by the wait.
    async fn load_entries(&mut self) -> Result<Vec<RawResultEntry>, SourceError> {
        let deadline = Instant::now() + self.page_timeout;

        loop {
            match self.fetch_current().await {
                Ok(body) => {
                    if let Some(parsed) = parse_results_page(&body) {
                        self.next_href = parsed.next_href;
                        return Ok(parsed.entries);
                    }
                    tracing::debug!(page = self.page, "results container not present yet");
                }
                Err(err) => {
                    tracing::debug!(page = self.page, error = %err, "transient fetch error while waiting for results");
                }
            }

            if Instant::now() + self.poll_interval >= deadline {
                return Err(SourceError::PageLoadTimeout(self.page_timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn advance(&mut self) -> Result<bool, SourceError> {
        let Some(href) = self.next_href.take() else {
            return Ok(false);
        };

        self.current_url = self.current_url.join(&href)?;
        self.page += 1;
        Ok(true)
    }
}

/// Best-effort citation-format exporter over the Scholar citation popup.
#[derive(Debug, Clone)]
pub struct ScholarCitationExporter {
    client: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl ScholarCitationExporter {
    /// Exporter against scholar.google.com
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self::with_base_url(SCHOLAR_BASE_URL, client, timeout)
    }

    /// Exporter against an alternate base URL (mirrors, tests)
    pub fn with_base_url(base_url: &str, client: HttpClient, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn fetch_citation(&self, url: &str) -> Result<Option<String>, SourceError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "citation popup returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read response: {}", e)))?;

        Ok(parse_citation_popup(&body))
    }
}

#[async_trait]
impl CitationExporter for ScholarCitationExporter {
    async fn export(&self, entry: &RawResultEntry) -> Option<String> {
        let key = entry.citation_key.as_deref()?;

        let url = format!(
            "{}/scholar?q=info:{}:scholar.google.com/&output=cite&scirp=0&hl=en",
            self.base_url, key
        );

        match tokio::time::timeout(self.timeout, self.fetch_citation(&url)).await {
            Ok(Ok(Some(citation))) => Some(citation),
            Ok(Ok(None)) => {
                tracing::debug!(key, "citation popup had no citation block");
                None
            }
            Ok(Err(err)) => {
                tracing::debug!(key, error = %err, "citation export failed");
                None
            }
            Err(_) => {
                tracing::debug!(key, "citation export timed out");
                None
            }
        }
    }
}

/// One-shot first-page search against Google Scholar.
///
/// The paginated pipeline is driven through [`ScholarSession`] directly;
/// this connector exists so Scholar participates in the registry alongside
/// the placeholder sources.
#[derive(Debug, Clone)]
pub struct ScholarConnector {
    client: HttpClient,
}

impl ScholarConnector {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }
}

impl Default for ScholarConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for ScholarConnector {
    fn id(&self) -> &str {
        "scholar"
    }

    fn name(&self) -> &str {
        "Google Scholar"
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities::SEARCH
            | ConnectorCapabilities::PAGINATION
            | ConnectorCapabilities::CITATIONS
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>, SourceError> {
        let mut session = ScholarSession::new(
            self.client.clone(),
            query,
            1,
            DEFAULT_PAGE_TIMEOUT,
            DEFAULT_POLL_INTERVAL,
        )?;

        let entries = session.load_entries().await?;
        Ok(RecordExtractor::new().extract(&entries).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_WITH_RESULTS: &str = r#"
        <html><body>
        <div id="gs_res_ccl_mid">
          <div class="gs_r gs_or gs_scl" data-cid="AbCd123">
            <h3 class="gs_rt"><a href="/paper-a">Paper A</a></h3>
            <div class="gs_a">J Smith, K Jones - Some Venue, 2019 - publisher.com</div>
          </div>
          <div class="gs_r gs_or gs_scl" data-cid="EfGh456">
            <h3 class="gs_rt"><span class="gs_ctu"><span class="gs_ct1">[CITATION]</span></span> Paper B</h3>
            <div class="gs_a">L Brown - 2020</div>
          </div>
        </div>
        <div id="gs_n"><table><tr>
          <td><a href="/scholar?hl=en&amp;q=test&amp;start=0"><b>Previous</b></a></td>
          <td><a href="/scholar?hl=en&amp;q=test&amp;start=10"><b>Next</b></a></td>
        </tr></table></div>
        </body></html>
    "#;

    const PAGE_LAST: &str = r#"
        <html><body>
        <div id="gs_res_ccl_mid">
          <div class="gs_r gs_or gs_scl">
            <h3 class="gs_rt"><a href="/paper-c">Paper C</a></h3>
            <div class="gs_a">M Green - Venue, 2021</div>
          </div>
        </div>
        </body></html>
    "#;

    const INTERSTITIAL: &str = "<html><body>Please show you're not a robot</body></html>";

    const CITATION_POPUP: &str = r#"
        <html><body>
        <div id="gs_citt"><table>
          <tr><th class="gs_cith">MLA</th>
              <td><div class="gs_citr">Smith, John. "Paper A." Some Venue (2019).</div></td></tr>
          <tr><th class="gs_cith">APA</th>
              <td><div class="gs_citr">Smith, J. (2019). Paper A.</div></td></tr>
        </table></div>
        </body></html>
    "#;

    fn session_for(server: &mockito::ServerGuard) -> ScholarSession {
        ScholarSession::with_base_url(
            &server.url(),
            HttpClient::new(),
            "test",
            1,
            Duration::from_millis(200),
            Duration::from_millis(10),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_results_page() {
        let parsed = parse_results_page(PAGE_WITH_RESULTS).unwrap();

        assert_eq!(parsed.entries.len(), 2);

        let first = &parsed.entries[0];
        assert_eq!(first.title_text, "Paper A");
        assert_eq!(first.meta_text, "J Smith, K Jones - Some Venue, 2019 - publisher.com");
        assert_eq!(first.marker, None);
        assert_eq!(first.citation_key.as_deref(), Some("AbCd123"));

        let second = &parsed.entries[1];
        assert_eq!(second.title_text, "Paper B");
        assert_eq!(second.marker.as_deref(), Some("[CITATION]"));

        assert_eq!(
            parsed.next_href.as_deref(),
            Some("/scholar?hl=en&q=test&start=10")
        );
    }

    #[test]
    fn test_parse_last_page_has_no_next() {
        let parsed = parse_results_page(PAGE_LAST).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert!(parsed.next_href.is_none());
    }

    #[test]
    fn test_interstitial_is_not_a_results_page() {
        assert!(parse_results_page(INTERSTITIAL).is_none());
    }

    #[test]
    fn test_parse_citation_popup() {
        let citation = parse_citation_popup(CITATION_POPUP).unwrap();
        assert_eq!(citation, r#"Smith, John. "Paper A." Some Venue (2019)."#);

        assert!(parse_citation_popup(INTERSTITIAL).is_none());
    }

    #[test]
    fn test_empty_query_rejected() {
        let result = ScholarSession::new(
            HttpClient::new(),
            "   ",
            1,
            DEFAULT_PAGE_TIMEOUT,
            DEFAULT_POLL_INTERVAL,
        );
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }

    #[test]
    fn test_start_page_offsets_url() {
        let session = ScholarSession::new(
            HttpClient::new(),
            "neural symbolic",
            3,
            DEFAULT_PAGE_TIMEOUT,
            DEFAULT_POLL_INTERVAL,
        )
        .unwrap();

        assert_eq!(session.page(), 3);
        assert!(session.current_url.as_str().contains("start=20"));
        assert!(session.current_url.as_str().contains("neural%20symbolic"));
    }

    #[tokio::test]
    async fn test_load_entries_and_advance() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::UrlEncoded("start".into(), "0".into()))
            .with_status(200)
            .with_body(PAGE_WITH_RESULTS)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::UrlEncoded("start".into(), "10".into()))
            .with_status(200)
            .with_body(PAGE_LAST)
            .create_async()
            .await;

        let mut session = session_for(&server);

        let entries = session.load_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(session.advance().await.unwrap());
        assert_eq!(session.page(), 2);

        let entries = session.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!session.advance().await.unwrap());

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_load_entries_times_out_on_interstitial() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(INTERSTITIAL)
            .expect_at_least(1)
            .create_async()
            .await;

        let mut session = session_for(&server);

        let err = session.load_entries().await.unwrap_err();
        assert!(matches!(err, SourceError::PageLoadTimeout(_)));
    }

    #[tokio::test]
    async fn test_exporter_resolves_citation() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(CITATION_POPUP)
            .create_async()
            .await;

        let exporter = ScholarCitationExporter::with_base_url(
            &server.url(),
            HttpClient::new(),
            Duration::from_secs(1),
        );

        let entry = RawResultEntry::new("Paper A", "2019").citation_key("AbCd123");
        let citation = exporter.export(&entry).await;
        assert_eq!(
            citation.as_deref(),
            Some(r#"Smith, John. "Paper A." Some Venue (2019)."#)
        );

        // No key means no fetch and no citation
        let plain = RawResultEntry::new("Paper B", "2020");
        assert!(exporter.export(&plain).await.is_none());
    }

    #[tokio::test]
    async fn test_exporter_swallows_failures() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let exporter = ScholarCitationExporter::with_base_url(
            &server.url(),
            HttpClient::new(),
            Duration::from_secs(1),
        );

        let entry = RawResultEntry::new("Paper A", "2019").citation_key("AbCd123");
        assert!(exporter.export(&entry).await.is_none());
    }
}
