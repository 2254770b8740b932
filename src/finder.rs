//! The source discovery pipeline.
//!
//! [`SourceFinder`] expands the gold query, searches, extracts and scores
//! each hit, classifies accepted pages by domain trust, snapshots the
//! collection and pairs it into the clear and unclear sets.
//!
//! Searches and extractions run one at a time. Each extraction is spawned
//! on its own task and awaited under a deadline; a task that misses the
//! deadline is detached, not aborted, and keeps running until its
//! extractor returns.

use chrono::Utc;
use futures_util::FutureExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::collaborators::{DuckDuckGoProvider, SearchProvider, TextExtractor, WebPageExtractor};
use crate::config::FinderConfig;
use crate::error::Result;
use crate::pairing;
use crate::query_plan::QueryPlan;
use crate::relevance::{KeywordFuzzyScorer, RelevanceScorer};
use crate::seen_urls::SeenUrls;
use crate::snapshot::{FileSnapshotSink, NoopSnapshotSink, SnapshotSink, SourceSnapshot};
use crate::source::{PairedResult, SearchHit, Source};
use crate::topic::Topic;
use crate::trust::{DomainTrustTable, domain_of};

/// Builds the clear and unclear source sets for one gold query.
pub struct SourceFinder {
    gold_query: String,
    topic: Topic,
    plan: QueryPlan,
    config: FinderConfig,
    trust: Arc<DomainTrustTable>,
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn TextExtractor>,
    scorer: Arc<dyn RelevanceScorer>,
    snapshot: Arc<dyn SnapshotSink>,
    seed: Option<u64>,
}

/// Counters reported at the end of collection.
#[derive(Debug, Default)]
struct RunCounters {
    queries_failed: usize,
    hits: usize,
    duplicates: usize,
    extracted: usize,
    accepted: usize,
}

impl SourceFinder {
    /// Create a finder wired to the production collaborators.
    ///
    /// Loads the trust table from `config.trust_config_path`; a missing or
    /// invalid file leaves every domain unknown.
    pub fn new(gold_query: impl Into<String>, config: FinderConfig) -> Self {
        let gold_query = gold_query.into();
        let topic = Topic::extract(&gold_query);
        let plan = QueryPlan::for_query(&gold_query);
        let trust = DomainTrustTable::load(&config.trust_config_path);
        let search_config = config.search_config();
        let snapshot: Arc<dyn SnapshotSink> = if config.write_snapshot {
            Arc::new(FileSnapshotSink::new(config.snapshot_path.clone()))
        } else {
            Arc::new(NoopSnapshotSink)
        };

        info!(query = %gold_query, %topic, "source finder created");

        Self {
            gold_query,
            topic,
            plan,
            trust: Arc::new(trust),
            search: Arc::new(DuckDuckGoProvider::new(search_config.clone())),
            extractor: Arc::new(WebPageExtractor::new(search_config)),
            scorer: Arc::new(KeywordFuzzyScorer),
            snapshot,
            seed: None,
            config,
        }
    }

    /// Replace the search collaborator.
    pub fn with_search_provider(mut self, provider: impl SearchProvider + 'static) -> Self {
        self.search = Arc::new(provider);
        self
    }

    /// Replace the extraction collaborator.
    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replace the relevance scorer.
    pub fn with_scorer(mut self, scorer: impl RelevanceScorer + 'static) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    /// Replace the snapshot sink.
    pub fn with_snapshot_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.snapshot = Arc::new(sink);
        self
    }

    /// Replace the trust table loaded from disk.
    pub fn with_trust_table(mut self, table: DomainTrustTable) -> Self {
        self.trust = Arc::new(table);
        self
    }

    /// Seed the pairing shuffle for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn gold_query(&self) -> &str {
        &self.gold_query
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn query_plan(&self) -> &QueryPlan {
        &self.plan
    }

    /// Run the pipeline. Never fails: any error or panic yields empty sets.
    pub async fn build(&self) -> PairedResult {
        match AssertUnwindSafe(self.find_sources()).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(error = %e, "source discovery failed");
                PairedResult::empty()
            }
            Err(panic) => {
                error!(panic = panic_message(&*panic), "source discovery panicked");
                PairedResult::empty()
            }
        }
    }

    /// Run the pipeline, returning configuration errors to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FinderError::Config`] for an invalid configuration.
    /// Collaborator failures are not errors; they only shrink the result.
    pub async fn find_sources(&self) -> Result<PairedResult> {
        self.config.validate()?;
        info!(
            query = %self.gold_query,
            topic = %self.topic,
            queries = self.plan.len(),
            reliable_domains = self.trust.reliable_len(),
            unreliable_domains = self.trust.unreliable_len(),
            "starting source discovery"
        );

        let sources = self.collect_sources().await;

        let snapshot = SourceSnapshot::new(&self.gold_query, self.topic, sources);
        if let Err(e) = self.snapshot.write(&snapshot) {
            warn!(error = %e, "failed to write source snapshot");
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(pairing::build(snapshot.sources, &mut rng))
    }

    async fn collect_sources(&self) -> Vec<Source> {
        let mut sources = Vec::new();
        let mut seen = SeenUrls::new();
        let mut counters = RunCounters::default();

        for (target, query) in self.plan.iter() {
            debug!(query, %target, "searching");
            let hits = match self
                .search
                .search(query, self.config.max_results_per_query)
                .await
            {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(query, error = %e, "search failed, skipping query");
                    counters.queries_failed += 1;
                    continue;
                }
            };
            debug!(query, count = hits.len(), "search returned");

            for hit in hits {
                counters.hits += 1;
                if self.config.dedupe_urls && !seen.insert(&hit.url) {
                    debug!(url = %hit.url, "already attempted, skipping");
                    counters.duplicates += 1;
                    continue;
                }
                let Some(text) = self.extract_text(&hit.url).await else {
                    continue;
                };
                counters.extracted += 1;
                if let Some(source) = self.evaluate(hit, &text) {
                    info!(
                        url = %source.url,
                        score = source.score,
                        category = %source.category,
                        "source accepted"
                    );
                    counters.accepted += 1;
                    sources.push(source);
                }
            }
        }

        info!(
            hits = counters.hits,
            duplicates = counters.duplicates,
            extracted = counters.extracted,
            accepted = counters.accepted,
            failed_queries = counters.queries_failed,
            "collection complete"
        );
        sources
    }

    /// Extract `url` under the per-URL deadline. Any failure yields `None`.
    async fn extract_text(&self, url: &str) -> Option<String> {
        let extractor = Arc::clone(&self.extractor);
        let owned = url.to_owned();
        let task = tokio::spawn(async move { extractor.extract(&owned).await });

        match tokio::time::timeout(self.config.extract_timeout(), task).await {
            Ok(Ok(Ok(Some(text)))) => Some(text),
            Ok(Ok(Ok(None))) => {
                debug!(url, "no text extracted");
                None
            }
            Ok(Ok(Err(e))) => {
                debug!(url, error = %e, "extraction failed");
                None
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "extraction task aborted");
                None
            }
            Err(_) => {
                warn!(
                    url,
                    timeout_secs = self.config.extract_timeout_secs,
                    "extraction timed out"
                );
                None
            }
        }
    }

    /// Apply the length and relevance thresholds, then classify.
    fn evaluate(&self, hit: SearchHit, text: &str) -> Option<Source> {
        let chars = text.chars().count();
        if chars < self.config.min_text_chars {
            debug!(url = %hit.url, chars, "text too short");
            return None;
        }

        let score = self.scorer.score(&self.gold_query, text);
        if score.is_nan() || score < self.config.min_relevance {
            debug!(url = %hit.url, score, "below relevance threshold");
            return None;
        }

        let category = self.trust.classify(&hit.url);
        Some(Source {
            domain: domain_of(&hit.url).unwrap_or_default(),
            category,
            score: score.clamp(0.0, 1.0),
            text: text.chars().take(self.config.stored_text_chars).collect(),
            title: hit.title,
            snippet: hit.snippet,
            url: hit.url,
            timestamp: Utc::now(),
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
