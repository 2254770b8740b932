//! Data model: accepted sources and the paired output sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust category of a source's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Domain appears in the reliable trust list.
    Reliable,
    /// Domain appears in the misleading trust list.
    Unreliable,
    /// Domain appears in neither list.
    Unknown,
}

impl Category {
    /// Stable lowercase label used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reliable => "reliable",
            Self::Unreliable => "unreliable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search hit as returned by a [`crate::SearchProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl From<source_search::SearchResult> for SearchHit {
    fn from(r: source_search::SearchResult) -> Self {
        Self {
            url: r.url,
            title: r.title,
            snippet: r.snippet,
        }
    }
}

/// A page that passed extraction and the relevance threshold.
///
/// Built once by the orchestrator and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    /// Host with a leading `www.` removed.
    pub domain: String,
    pub category: Category,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
    /// Leading slice of the extracted text.
    pub text: String,
    pub title: String,
    pub snippet: String,
    /// When the source was accepted.
    pub timestamp: DateTime<Utc>,
}

/// A source as it appears in the final output sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSource {
    pub url: String,
    pub domain: String,
    pub category: Category,
    pub title: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}

impl From<Source> for FormattedSource {
    fn from(s: Source) -> Self {
        Self {
            url: s.url,
            domain: s.domain,
            category: s.category,
            title: s.title,
            text: s.text,
            timestamp: s.timestamp,
            score: s.score,
        }
    }
}

/// The clear (mostly reliable) and unclear (mostly unreliable) sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairedResult {
    pub clear_set: Vec<FormattedSource>,
    pub unclear_set: Vec<FormattedSource>,
}

impl PairedResult {
    /// The fail-soft result: both sets empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when both sets are empty.
    pub fn is_empty(&self) -> bool {
        self.clear_set.is_empty() && self.unclear_set.is_empty()
    }
}

/// Per-category counts of a source collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub reliable: usize,
    pub unreliable: usize,
    pub unknown: usize,
    pub total: usize,
}

impl CollectionStats {
    /// Count sources by category.
    pub fn from_sources(sources: &[Source]) -> Self {
        sources
            .iter()
            .fold(Self::default(), |mut stats, source| {
                match source.category {
                    Category::Reliable => stats.reliable += 1,
                    Category::Unreliable => stats.unreliable += 1,
                    Category::Unknown => stats.unknown += 1,
                }
                stats.total += 1;
                stats
            })
    }
}
