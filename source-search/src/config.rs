//! Request configuration shared by search and page fetching.
//!
//! [`SearchConfig`] controls result limits, timeouts, safe search, and the
//! endpoint used for DuckDuckGo. The defaults match what the source finder
//! expects from a single polite scraper.

use crate::error::SearchError;

/// DuckDuckGo's HTML-only endpoint. Requires no JavaScript.
pub const DUCKDUCKGO_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Configuration for search requests and page fetches.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results parsed from a results page.
    pub max_results: usize,
    /// HTTP request timeout in seconds (applies to searches and fetches).
    pub timeout_seconds: u64,
    /// Whether to ask the engine for safe search filtering.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Upper bound on characters returned by content extraction.
    pub max_content_chars: usize,
    /// Search endpoint. Overridable so tests can point at a local server.
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 15,
            timeout_seconds: 8,
            safe_search: false,
            user_agent: None,
            max_content_chars: crate::content::DEFAULT_MAX_CHARS,
            endpoint: DUCKDUCKGO_HTML_ENDPOINT.to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `max_content_chars` must be greater than 0
    /// - `endpoint` must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_content_chars == 0 {
            return Err(SearchError::Config(
                "max_content_chars must be greater than 0".into(),
            ));
        }
        match url::Url::parse(&self.endpoint) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
            _ => Err(SearchError::Config(format!(
                "endpoint is not an http(s) URL: {}",
                self.endpoint
            ))),
        }
    }
}
