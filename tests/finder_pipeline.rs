//! End-to-end tests of the discovery pipeline with scripted collaborators.
//!
//! No public network access: scripted providers stand in for search and
//! extraction, and the production collaborators run against a local mock
//! server.

use async_trait::async_trait;
use source_finder::{
    Category, DomainTrustTable, FinderConfig, FinderError, MemorySnapshotSink, PairedResult,
    RelevanceScorer, SearchError, SearchHit, SearchProvider, SearchSettings, SnapshotSink,
    SourceFinder, SourceSnapshot, TextExtractor, Topic,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY: &str = "measles vaccine";

// ---------------------------------------------------------------------------
// Scripted collaborators
// ---------------------------------------------------------------------------

/// Returns the same hits for every query except those marked as failing.
#[derive(Default, Clone)]
struct ScriptedSearch {
    hits: Vec<SearchHit>,
    failing: HashSet<String>,
    per_query: HashMap<String, Vec<SearchHit>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSearch {
    fn returning(urls: &[&str]) -> Self {
        Self {
            hits: urls.iter().map(|u| hit(u)).collect(),
            ..Default::default()
        }
    }

    fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_owned());
        self
    }

    fn only_for(mut self, query: &str, urls: &[&str]) -> Self {
        self.per_query
            .insert(query.to_owned(), urls.iter().map(|u| hit(u)).collect());
        self
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.lock().unwrap().push(query.to_owned());
        if self.failing.contains(query) {
            return Err(SearchError::Http("scripted failure".into()));
        }
        let hits = self.per_query.get(query).unwrap_or(&self.hits);
        Ok(hits.iter().take(max_results).cloned().collect())
    }
}

struct PanickingSearch;

#[async_trait]
impl SearchProvider for PanickingSearch {
    async fn search(&self, _query: &str, _max: usize) -> Result<Vec<SearchHit>, SearchError> {
        panic!("search backend exploded");
    }
}

#[derive(Clone)]
enum Page {
    Text(String),
    Empty,
    Error,
    Slow(Duration, String),
    Panic,
}

#[derive(Default, Clone)]
struct ScriptedExtractor {
    pages: HashMap<String, Page>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExtractor {
    fn page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_owned(), page);
        self
    }
}

#[async_trait]
impl TextExtractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Result<Option<String>, SearchError> {
        self.calls.lock().unwrap().push(url.to_owned());
        match self.pages.get(url).cloned() {
            Some(Page::Text(text)) => Ok(Some(text)),
            Some(Page::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(Some(text))
            }
            Some(Page::Panic) => panic!("extractor crashed on {url}"),
            Some(Page::Error) => Err(SearchError::Http("connection reset".into())),
            Some(Page::Empty) | None => Ok(None),
        }
    }
}

struct FixedScore(f64);

impl RelevanceScorer for FixedScore {
    fn score(&self, _query: &str, _text: &str) -> f64 {
        self.0
    }
}

struct FailingSink;

impl SnapshotSink for FailingSink {
    fn write(&self, _snapshot: &SourceSnapshot) -> source_finder::Result<()> {
        Err(FinderError::Snapshot("disk full".into()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hit(url: &str) -> SearchHit {
    SearchHit {
        url: url.to_owned(),
        title: format!("Title for {url}"),
        snippet: format!("Snippet for {url}"),
    }
}

/// Relevant text of exactly `chars` characters.
fn text_of(chars: usize) -> String {
    "measles vaccine "
        .repeat(chars / 16 + 1)
        .chars()
        .take(chars)
        .collect()
}

fn trust() -> DomainTrustTable {
    DomainTrustTable::new(
        ["cdc.gov", "who.int", "nih.gov", "nhs.uk", "mayoclinic.org", "hopkins.edu"],
        ["naturalnews.com", "reddit.com", "mercola.com", "infowars.com", "twitter.com"],
    )
}

fn config() -> FinderConfig {
    FinderConfig {
        write_snapshot: false,
        ..Default::default()
    }
}

fn finder(search: impl SearchProvider + 'static, extractor: ScriptedExtractor) -> SourceFinder {
    SourceFinder::new(QUERY, config())
        .with_search_provider(search)
        .with_extractor(extractor)
        .with_trust_table(trust())
        .with_seed(17)
}

fn urls(set: &[source_finder::FormattedSource]) -> Vec<String> {
    set.iter().map(|s| s.url.clone()).collect()
}

// ---------------------------------------------------------------------------
// Acceptance thresholds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_length_boundary_is_inclusive_at_400() {
    let sink = MemorySnapshotSink::new();
    let extractor = ScriptedExtractor::default()
        .page("https://cdc.gov/short", Page::Text(text_of(399)))
        .page("https://cdc.gov/exact", Page::Text(text_of(400)));
    let f = finder(
        ScriptedSearch::returning(&["https://cdc.gov/short", "https://cdc.gov/exact"]),
        extractor,
    )
    .with_scorer(FixedScore(0.9))
    .with_snapshot_sink(sink.clone());

    let result = f.build().await;

    assert_eq!(urls(&result.clear_set), ["https://cdc.gov/exact"]);
    let snapshot = &sink.snapshots()[0];
    assert_eq!(snapshot.sources.len(), 1);
}

#[tokio::test]
async fn length_counts_characters_not_bytes() {
    // 400 two-byte characters.
    let text = "é".repeat(400);
    let extractor = ScriptedExtractor::default().page("https://who.int/fr", Page::Text(text));
    let f = finder(ScriptedSearch::returning(&["https://who.int/fr"]), extractor)
        .with_scorer(FixedScore(0.5));

    let result = f.build().await;
    assert_eq!(result.clear_set.len(), 1);
}

#[tokio::test]
async fn score_threshold_is_inclusive_at_035() {
    let page = || ScriptedExtractor::default().page("https://nih.gov/a", Page::Text(text_of(600)));

    let at = finder(ScriptedSearch::returning(&["https://nih.gov/a"]), page())
        .with_scorer(FixedScore(0.35))
        .build()
        .await;
    assert_eq!(at.clear_set.len(), 1);
    assert!((at.clear_set[0].score - 0.35).abs() < f64::EPSILON);

    let below = finder(ScriptedSearch::returning(&["https://nih.gov/a"]), page())
        .with_scorer(FixedScore(0.349_999))
        .build()
        .await;
    assert!(below.is_empty());
}

#[tokio::test]
async fn irrelevant_text_is_rejected_by_default_scorer() {
    let extractor = ScriptedExtractor::default().page(
        "https://cdc.gov/cats",
        Page::Text("Domestic cats sleep for most of the day. ".repeat(20)),
    );
    let result = finder(ScriptedSearch::returning(&["https://cdc.gov/cats"]), extractor)
        .build()
        .await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn stored_text_is_truncated_to_1000_chars() {
    let extractor =
        ScriptedExtractor::default().page("https://cdc.gov/long", Page::Text(text_of(5000)));
    let result = finder(ScriptedSearch::returning(&["https://cdc.gov/long"]), extractor)
        .build()
        .await;
    assert_eq!(result.clear_set[0].text.chars().count(), 1000);
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_failing_search_does_not_abort_the_run() {
    let search = ScriptedSearch::default()
        .failing_on(QUERY)
        .only_for("measles vaccine research", &["https://cdc.gov/research"]);
    let calls = Arc::clone(&search.calls);
    let extractor =
        ScriptedExtractor::default().page("https://cdc.gov/research", Page::Text(text_of(800)));

    let result = finder(search, extractor).build().await;

    assert_eq!(urls(&result.clear_set), ["https://cdc.gov/research"]);
    // Every planned query was still issued.
    assert_eq!(calls.lock().unwrap().len(), 12);
}

#[tokio::test]
async fn extraction_errors_and_empty_pages_are_skipped() {
    let extractor = ScriptedExtractor::default()
        .page("https://cdc.gov/error", Page::Error)
        .page("https://cdc.gov/empty", Page::Empty)
        .page("https://cdc.gov/good", Page::Text(text_of(500)));
    let search = ScriptedSearch::returning(&[
        "https://cdc.gov/error",
        "https://cdc.gov/empty",
        "https://cdc.gov/good",
    ]);

    let result = finder(search, extractor).build().await;
    assert_eq!(urls(&result.clear_set), ["https://cdc.gov/good"]);
}

#[tokio::test(start_paused = true)]
async fn slow_extraction_times_out_and_later_urls_still_run() {
    let extractor = ScriptedExtractor::default()
        .page(
            "https://cdc.gov/slow",
            Page::Slow(Duration::from_secs(60), text_of(500)),
        )
        .page("https://who.int/fast", Page::Text(text_of(500)));
    let calls = Arc::clone(&extractor.calls);
    let search = ScriptedSearch::returning(&["https://cdc.gov/slow", "https://who.int/fast"]);

    let result = finder(search, extractor).build().await;

    assert_eq!(urls(&result.clear_set), ["https://who.int/fast"]);
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn panicking_extractor_only_loses_that_url() {
    let extractor = ScriptedExtractor::default()
        .page("https://cdc.gov/boom", Page::Panic)
        .page("https://nih.gov/ok", Page::Text(text_of(500)));
    let search = ScriptedSearch::returning(&["https://cdc.gov/boom", "https://nih.gov/ok"]);

    let result = finder(search, extractor).build().await;
    assert_eq!(urls(&result.clear_set), ["https://nih.gov/ok"]);
}

#[tokio::test]
async fn panic_in_pipeline_yields_empty_sets() {
    let result = finder(PanickingSearch, ScriptedExtractor::default())
        .build()
        .await;
    assert_eq!(result, PairedResult::empty());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({"clear_set": [], "unclear_set": []})
    );
}

#[tokio::test]
async fn invalid_config_yields_empty_sets() {
    let bad = FinderConfig {
        max_results_per_query: 0,
        ..config()
    };
    let f = SourceFinder::new(QUERY, bad)
        .with_search_provider(ScriptedSearch::returning(&["https://cdc.gov/a"]))
        .with_extractor(
            ScriptedExtractor::default().page("https://cdc.gov/a", Page::Text(text_of(500))),
        );

    assert!(matches!(
        f.find_sources().await,
        Err(FinderError::Config(_))
    ));
    assert!(f.build().await.is_empty());
}

#[tokio::test]
async fn snapshot_failure_is_not_fatal() {
    let extractor =
        ScriptedExtractor::default().page("https://cdc.gov/a", Page::Text(text_of(500)));
    let result = finder(ScriptedSearch::returning(&["https://cdc.gov/a"]), extractor)
        .with_snapshot_sink(FailingSink)
        .build()
        .await;
    assert_eq!(result.clear_set.len(), 1);
}

// ---------------------------------------------------------------------------
// Dedupe, snapshot and pairing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn equivalent_urls_across_queries_are_extracted_once() {
    let search = ScriptedSearch::returning(&[
        "https://cdc.gov/measles/",
        "https://CDC.gov/measles?utm_source=ddg#top",
    ]);
    let extractor = ScriptedExtractor::default()
        .page("https://cdc.gov/measles/", Page::Text(text_of(500)));
    let calls = Arc::clone(&extractor.calls);

    let result = finder(search, extractor).build().await;

    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(result.clear_set.len(), 1);
}

#[tokio::test]
async fn snapshot_records_every_accepted_source() {
    let sink = MemorySnapshotSink::new();
    let extractor = ScriptedExtractor::default()
        .page("https://cdc.gov/a", Page::Text(text_of(500)))
        .page("https://naturalnews.com/b", Page::Text(text_of(500)))
        .page("https://medium.com/c", Page::Text(text_of(500)));
    let search = ScriptedSearch::returning(&[
        "https://cdc.gov/a",
        "https://naturalnews.com/b",
        "https://medium.com/c",
    ]);

    finder(search, extractor)
        .with_snapshot_sink(sink.clone())
        .build()
        .await;

    let snapshots = sink.snapshots();
    assert_eq!(snapshots.len(), 1);
    let snapshot = &snapshots[0];
    assert_eq!(snapshot.gold_query, QUERY);
    assert_eq!(snapshot.topic, Topic::PublicHealth);
    assert_eq!(snapshot.collection_stats.reliable, 1);
    assert_eq!(snapshot.collection_stats.unreliable, 1);
    assert_eq!(snapshot.collection_stats.unknown, 1);
    assert_eq!(snapshot.collection_stats.total, 3);
    let unknown = snapshot
        .sources
        .iter()
        .find(|s| s.category == Category::Unknown)
        .unwrap();
    assert_eq!(unknown.domain, "medium.com");
    assert_eq!(unknown.snippet, "Snippet for https://medium.com/c");
}

const RELIABLE: [&str; 6] = [
    "https://cdc.gov/1",
    "https://www.who.int/2",
    "https://nih.gov/3",
    "https://nhs.uk/4",
    "https://mayoclinic.org/5",
    "https://hopkins.edu/6",
];
const UNRELIABLE: [&str; 5] = [
    "https://naturalnews.com/1",
    "https://www.reddit.com/r/2",
    "https://mercola.com/3",
    "https://infowars.com/4",
    "https://twitter.com/5",
];
const UNKNOWN: [&str; 2] = ["https://medium.com/1", "https://substack.com/2"];

fn stratified_finder(seed: u64) -> SourceFinder {
    let all: Vec<&str> = RELIABLE
        .iter()
        .chain(UNRELIABLE.iter())
        .chain(UNKNOWN.iter())
        .copied()
        .collect();
    let extractor = all.iter().fold(ScriptedExtractor::default(), |e, url| {
        e.page(url, Page::Text(text_of(500)))
    });
    finder(ScriptedSearch::returning(&all), extractor).with_seed(seed)
}

#[tokio::test]
async fn full_pools_pair_into_target_composition() {
    let result = stratified_finder(3).build().await;

    let clear: Vec<_> = result.clear_set.iter().map(|s| s.category).collect();
    let unclear: Vec<_> = result.unclear_set.iter().map(|s| s.category).collect();
    assert_eq!(
        clear,
        [
            Category::Reliable,
            Category::Reliable,
            Category::Reliable,
            Category::Reliable,
            Category::Unreliable
        ]
    );
    assert_eq!(
        unclear,
        [
            Category::Reliable,
            Category::Unreliable,
            Category::Unreliable,
            Category::Unreliable
        ]
    );

    let clear_urls: HashSet<_> = urls(&result.clear_set).into_iter().collect();
    let unclear_urls: HashSet<_> = urls(&result.unclear_set).into_iter().collect();
    assert!(clear_urls.is_disjoint(&unclear_urls));
    assert!(
        clear_urls
            .iter()
            .chain(unclear_urls.iter())
            .all(|u| !UNKNOWN.contains(&u.as_str()))
    );
}

#[tokio::test]
async fn same_seed_gives_same_pairing() {
    let a = stratified_finder(99).build().await;
    let b = stratified_finder(99).build().await;
    assert_eq!(urls(&a.clear_set), urls(&b.clear_set));
    assert_eq!(urls(&a.unclear_set), urls(&b.unclear_set));
}

// ---------------------------------------------------------------------------
// Production collaborators against a mock server
// ---------------------------------------------------------------------------

fn results_page(base: &str) -> String {
    let result = |path: &str, title: &str| {
        format!(
            r#"<div class="result results_links results_links_deep web-result">
  <div class="links_main links_deep result__body">
    <h2 class="result__title"><a class="result__a" href="{base}{path}">{title}</a></h2>
    <a class="result__snippet" href="{base}{path}">About the measles vaccine.</a>
  </div>
</div>"#
        )
    };
    format!(
        "<html><body><div id=\"links\" class=\"results\">{}{}</div></body></html>",
        result("/measles-facts", "Measles vaccine facts"),
        result("/cat-pictures", "Cat pictures"),
    )
}

fn article(body: &str) -> String {
    format!(
        "<html><head><title>Article</title></head><body><nav>Home | About</nav>\
         <article><h1>Article</h1><p>{body}</p></article></body></html>"
    )
}

#[tokio::test]
async fn production_collaborators_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(results_page(&server.uri()), "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/measles-facts"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            article(&"The measles vaccine is safe and highly effective. ".repeat(20)),
            "text/html; charset=utf-8",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cat-pictures"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            article(&"Cats like boxes and warm windowsills. ".repeat(20)),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let trust_path = dir.path().join("domain_trust_config.json");
    std::fs::write(
        &trust_path,
        r#"{"public_health": {"reliable": ["127.0.0.1"], "misleading": []}}"#,
    )
    .unwrap();
    let snapshot_path = dir.path().join("scraped_sources.json");

    let config = FinderConfig {
        trust_config_path: trust_path,
        write_snapshot: true,
        snapshot_path: snapshot_path.clone(),
        search: SearchSettings {
            timeout_secs: 5,
            user_agent: Some("SourceFinderTest/1.0".into()),
            endpoint: Some(format!("{}/html/", server.uri())),
            ..Default::default()
        },
        ..Default::default()
    };

    let result = SourceFinder::new(QUERY, config).with_seed(1).build().await;

    assert_eq!(result.clear_set.len(), 1);
    let source = &result.clear_set[0];
    assert!(source.url.ends_with("/measles-facts"));
    assert_eq!(source.category, Category::Reliable);
    assert_eq!(source.domain, "127.0.0.1");
    assert!(source.text.contains("measles vaccine"));
    assert!(result.unclear_set.is_empty());

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["gold_query"], QUERY);
    assert_eq!(snapshot["collection_stats"]["total"], 1);
}
