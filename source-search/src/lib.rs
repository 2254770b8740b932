//! # source-search
//!
//! Keyless web search and page text extraction for the source finder.
//!
//! Scrapes DuckDuckGo's HTML endpoint directly (no API keys) and fetches
//! result pages, reducing them to readable text.
//!
//! ## Design
//!
//! - One engine, queried sequentially by the caller
//! - User-Agent rotation with a per-request timeout
//! - Boilerplate-stripping content extraction over the parsed DOM
//! - Errors are values; the caller decides whether a failure is fatal
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - Search queries are logged only at trace level

pub mod config;
pub mod content;
pub mod engines;
pub mod error;
pub mod http;
pub mod types;

pub use config::SearchConfig;
pub use engines::DuckDuckGoEngine;
pub use error::{Result, SearchError};
pub use types::{PageContent, SearchResult};

/// Search the web for `query`.
///
/// Returns up to `config.max_results` organic results in engine order.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, or the
/// engine's HTTP / parse error.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> source_search::Result<()> {
/// let config = source_search::SearchConfig::default();
/// let results = source_search::search("flu vaccine safety", &config).await?;
/// for result in &results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    config.validate()?;
    DuckDuckGoEngine.search(query, config).await
}

/// Fetch a web page and extract its readable text content.
///
/// Downloads the page at `url`, rejects non-success statuses and
/// non-textual content types, then strips boilerplate and returns the
/// main content as clean text of at most `config.max_content_chars`
/// characters.
///
/// # Errors
///
/// Returns [`SearchError::Http`] / [`SearchError::Timeout`] if the page
/// cannot be fetched, or [`SearchError::Parse`] if nothing readable remains.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> source_search::Result<()> {
/// let config = source_search::SearchConfig::default();
/// let page = source_search::fetch_page_content("https://example.com", &config).await?;
/// println!("Title: {}", page.title);
/// println!("Words: {}", page.word_count);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_page_content(url: &str, config: &SearchConfig) -> Result<PageContent> {
    config.validate()?;
    let parsed = url::Url::parse(url)
        .map_err(|e| SearchError::Http(format!("invalid URL {url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SearchError::Http(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }

    let client = http::build_client(config)?;
    let response = client
        .get(parsed)
        .header("Accept", http::ACCEPT_HTML)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| http::classify_request_error("page request failed", &e))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("page HTTP error: {e}")))?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if !http::is_textual_content_type(content_type.as_deref()) {
        return Err(SearchError::Parse(format!(
            "unsupported content type: {}",
            content_type.unwrap_or_default()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| http::classify_request_error("page read failed", &e))?;
    tracing::trace!(bytes = html.len(), "page fetched");

    content::extract_content_with_limit(&html, url, config.max_content_chars)
}
