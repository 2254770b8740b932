//! Error types for the source finder.

use source_search::SearchError;

/// Top-level error type for source discovery.
///
/// [`crate::SourceFinder::build`] never returns one of these; it converts
/// them into an empty result. They surface from the fallible building
/// blocks (config loading, [`crate::SourceFinder::find_sources`]).
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Search or page-fetch failure from the web layer.
    ///
    /// The pipeline itself swallows collaborator errors. This variant lets
    /// callers that drive a [`crate::SearchProvider`] or
    /// [`crate::TextExtractor`] directly propagate failures with `?`.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Debug snapshot could not be written.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FinderError>;
