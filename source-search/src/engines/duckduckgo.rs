//! DuckDuckGo search via the HTML-only endpoint.
//!
//! Uses `https://html.duckduckgo.com/html/`, which requires no JavaScript
//! and is tolerant of automated requests. Results are requested for the
//! worldwide region (`kl=wt-wt`).

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::SearchResult;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Organic result containers; sponsored blocks carry `.result--ad`.
const RESULT_SELECTOR: &str =
    ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)";
const TITLE_SELECTOR: &str = ".result__a";
const SNIPPET_SELECTOR: &str = ".result__snippet";

/// DuckDuckGo HTML search engine scraper.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoEngine;

impl DuckDuckGoEngine {
    /// Perform a search and return up to `config.max_results` organic results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] / [`SearchError::Timeout`] if the request
    /// fails, or [`SearchError::Parse`] if a selector cannot be built.
    pub async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, endpoint = %config.endpoint, "DuckDuckGo search");

        let safe = if config.safe_search { "1" } else { "-2" };
        let form = [("q", query), ("kl", "wt-wt"), ("kp", safe)];

        let html = http::build_client(config)?
            .post(&config.endpoint)
            .form(&form)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| http::classify_request_error("DuckDuckGo request failed", &e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?
            .text()
            .await
            .map_err(|e| http::classify_request_error("DuckDuckGo response read failed", &e))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");
        parse_duckduckgo_html(&html, config.max_results)
    }
}

struct ResultSelectors {
    result: Selector,
    title: Selector,
    snippet: Selector,
}

impl ResultSelectors {
    fn new() -> Result<Self, SearchError> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
        };
        Ok(Self {
            result: parse(RESULT_SELECTOR)?,
            title: parse(TITLE_SELECTOR)?,
            snippet: parse(SNIPPET_SELECTOR)?,
        })
    }
}

/// Parse a DuckDuckGo results page.
///
/// Ads are excluded. Results missing a title or an http(s) link are
/// skipped. At most `max_results` results are returned, in page order.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let selectors = ResultSelectors::new()?;
    let document = Html::parse_document(html);

    let results: Vec<SearchResult> = document
        .select(&selectors.result)
        .filter_map(|block| parse_result(block, &selectors))
        .take(max_results)
        .collect();

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

fn parse_result(block: ElementRef<'_>, selectors: &ResultSelectors) -> Option<SearchResult> {
    let anchor = block.select(&selectors.title).next()?;
    let title = squash(anchor.text());
    if title.is_empty() {
        return None;
    }
    let url = unwrap_redirect(anchor.value().attr("href")?)?;
    let snippet = block
        .select(&selectors.snippet)
        .next()
        .map(|el| squash(el.text()))
        .unwrap_or_default();

    Some(SearchResult {
        title,
        url,
        snippet,
    })
}

/// Resolve a result link to its target.
///
/// DDG wraps targets as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
/// Protocol-relative links are read as https. Only http(s) targets are
/// returned.
fn unwrap_redirect(href: &str) -> Option<String> {
    let href = href.trim();
    let absolute = match href.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")).ok()?,
        None => Url::parse(href).ok()?,
    };

    let target = if absolute.host_str() == Some("duckduckgo.com") && absolute.path() == "/l/" {
        let (_, encoded) = absolute.query_pairs().find(|(key, _)| key == "uddg")?;
        Url::parse(&encoded).ok()?
    } else {
        absolute
    };

    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}

fn squash<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
