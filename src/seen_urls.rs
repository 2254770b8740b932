//! Per-run record of attempted URLs.
//!
//! URLs are compared in a canonical form so that the same page returned by
//! several queries (differing only in tracking parameters, fragment, port
//! or a trailing slash) is extracted once.

use std::collections::HashSet;
use url::Url;

/// Tracking query parameters dropped during normalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
];

/// Canonical form of `raw` for duplicate detection.
///
/// Lowercases scheme and host, drops default ports, tracking parameters,
/// the fragment and a trailing path slash, and sorts the remaining query
/// pairs. Unparseable input is returned trimmed but otherwise unchanged.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_owned();
    };

    parsed.set_fragment(None);

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.to_ascii_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();
    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&params);
    }

    let path = parsed.path().to_owned();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}

/// URLs already attempted in this run.
#[derive(Debug, Default)]
pub struct SeenUrls {
    seen: HashSet<String>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url`; returns `false` if an equivalent URL was already seen.
    pub fn insert(&mut self, url: &str) -> bool {
        self.seen.insert(normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
