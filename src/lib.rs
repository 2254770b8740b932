//! Source finder: builds labeled evaluation source sets for a topical query.
//!
//! Given a gold query, the finder searches the web with a fixed set of
//! query variants, extracts page text, keeps pages that are long enough
//! and relevant enough, classifies each by domain trust, and pairs them
//! into two sets:
//!
//! - a **clear** set, 4 reliable to 1 unreliable source;
//! - an **unclear** set, 1 reliable to 3 unreliable sources.
//!
//! # Architecture
//!
//! - **Topic**: keyword hint for the query ([`topic`])
//! - **Trust**: domain classification against a trust table ([`trust`])
//! - **Relevance**: keyword hit rate blended with fuzzy similarity ([`relevance`])
//! - **Pairing**: stratified, seeded partitioning ([`pairing`])
//! - **Finder**: the orchestrating pipeline ([`finder`])
//!
//! Web access goes through the [`SearchProvider`] and [`TextExtractor`]
//! traits; the defaults use the `source-search` crate.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod finder;
pub mod logging;
pub mod pairing;
pub mod query_plan;
pub mod relevance;
pub mod seen_urls;
pub mod snapshot;
pub mod source;
pub mod topic;
pub mod trust;

pub use collaborators::{DuckDuckGoProvider, SearchProvider, TextExtractor, WebPageExtractor};
pub use config::{FinderConfig, SearchSettings};
pub use error::{FinderError, Result};
pub use finder::SourceFinder;
pub use pairing::PairingPlan;
pub use query_plan::QueryPlan;
pub use relevance::{KeywordFuzzyScorer, RelevanceScorer};
pub use snapshot::{
    FileSnapshotSink, MemorySnapshotSink, NoopSnapshotSink, SnapshotSink, SourceSnapshot,
};
pub use source::{Category, CollectionStats, FormattedSource, PairedResult, SearchHit, Source};
pub use source_search::SearchError;
pub use topic::Topic;
pub use trust::DomainTrustTable;
