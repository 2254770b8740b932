//! Seams to the web: search and page text extraction.
//!
//! The orchestrator depends only on these traits. The production
//! implementations delegate to the `source-search` crate; tests script
//! their own.

use async_trait::async_trait;
use source_search::{SearchConfig, SearchError};
use tracing::trace;

use crate::source::SearchHit;

/// Web search returning ranked hits for a query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return at most `max_results` hits for `query`.
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchHit>, SearchError>;
}

/// Reduces a page to its readable text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// `Ok(None)` means the page had no usable text.
    async fn extract(&self, url: &str) -> Result<Option<String>, SearchError>;
}

/// DuckDuckGo HTML search.
#[derive(Debug, Clone, Default)]
pub struct DuckDuckGoProvider {
    config: SearchConfig,
}

impl DuckDuckGoProvider {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let config = SearchConfig {
            max_results,
            ..self.config.clone()
        };
        let results = source_search::search(query, &config).await?;
        Ok(results.into_iter().map(SearchHit::from).collect())
    }
}

/// HTTP fetch plus boilerplate-stripping extraction.
#[derive(Debug, Clone, Default)]
pub struct WebPageExtractor {
    config: SearchConfig,
}

impl WebPageExtractor {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TextExtractor for WebPageExtractor {
    async fn extract(&self, url: &str) -> Result<Option<String>, SearchError> {
        let page = source_search::fetch_page_content(url, &self.config).await?;
        trace!(url, words = page.word_count, "page extracted");
        let text = page.text.trim();
        Ok((!text.is_empty()).then(|| text.to_owned()))
    }
}
