//! Error types for the source-search crate.
//!
//! All errors carry stable string messages suitable for logs. Query text
//! never appears in error messages.

/// Errors that can occur while searching or fetching page content.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response could not be parsed into results or readable text.
    #[error("parse error: {0}")]
    Parse(String),

    /// An operation exceeded its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for source-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
