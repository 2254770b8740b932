//! Domain trust table and URL classification.
//!
//! The trust configuration is a JSON object keyed by topic:
//!
//! ```json
//! {
//!   "public_health": { "reliable": ["cdc.gov"], "misleading": ["naturalnews.com"] },
//!   "finance":       { "reliable": ["sec.gov"], "misleading": [] }
//! }
//! ```
//!
//! Every topic section is unioned into one table regardless of the query's
//! topic. A domain matches an entry exactly or as a dot-anchored subdomain,
//! so `news.cdc.gov` matches `cdc.gov` but `cdc.gov.example.com` does not.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

use crate::error::{FinderError, Result};
use crate::source::Category;

/// Reliable and unreliable domain sets, read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainTrustTable {
    reliable: HashSet<String>,
    unreliable: HashSet<String>,
}

impl DomainTrustTable {
    /// Build a table from explicit domain lists.
    pub fn new<R, U>(reliable: R, unreliable: U) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        U: IntoIterator,
        U::Item: AsRef<str>,
    {
        Self {
            reliable: normalise_entries(reliable),
            unreliable: normalise_entries(unreliable),
        }
    }

    /// Load and union every topic section of the JSON file at `path`.
    ///
    /// A missing or invalid file yields an empty table and a warning; this
    /// never fails.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "trust config unreadable, using empty domain lists");
                return Self::default();
            }
        };
        match Self::from_json_str(&content) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    reliable = table.reliable.len(),
                    unreliable = table.unreliable.len(),
                    "trust config loaded"
                );
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid trust config, using empty domain lists");
                Self::default()
            }
        }
    }

    /// Parse the trust configuration JSON.
    ///
    /// Non-object topic sections and non-string entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Json`] for malformed JSON, or
    /// [`FinderError::Config`] when the top level is not an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(topics) = root else {
            return Err(FinderError::Config(
                "trust config must be a JSON object keyed by topic".into(),
            ));
        };

        let mut reliable = Vec::new();
        let mut unreliable = Vec::new();
        for section in topics.values() {
            let Value::Object(section) = section else {
                continue;
            };
            reliable.extend(string_entries(section.get("reliable")));
            unreliable.extend(string_entries(section.get("misleading")));
        }
        Ok(Self::new(reliable, unreliable))
    }

    /// Number of reliable domains.
    pub fn reliable_len(&self) -> usize {
        self.reliable.len()
    }

    /// Number of unreliable domains.
    pub fn unreliable_len(&self) -> usize {
        self.unreliable.len()
    }

    /// Classify `url` by its host. Reliable entries are checked first.
    ///
    /// A URL without a parseable host is logged and classified
    /// [`Category::Unknown`].
    pub fn classify(&self, url: &str) -> Category {
        let Some(domain) = domain_of(url) else {
            warn!(url, "cannot parse host, classifying as unknown");
            return Category::Unknown;
        };
        if matches_any(&domain, &self.reliable) {
            Category::Reliable
        } else if matches_any(&domain, &self.unreliable) {
            Category::Unreliable
        } else {
            Category::Unknown
        }
    }
}

/// Lowercased host of `url` with a leading `www.` removed.
///
/// Returns `None` when the URL does not parse or has no host.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    let domain = host.strip_prefix("www.").unwrap_or(host);
    (!domain.is_empty()).then(|| domain.to_owned())
}

fn matches_any(domain: &str, entries: &HashSet<String>) -> bool {
    if entries.contains(domain) {
        return true;
    }
    // Walk parent domains: a.b.c → b.c → c
    let mut rest = domain;
    while let Some((_, parent)) = rest.split_once('.') {
        if entries.contains(parent) {
            return true;
        }
        rest = parent;
    }
    false
}

fn string_entries(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn normalise_entries<I, S>(entries: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|e| {
            let e = e.as_ref().trim().to_ascii_lowercase();
            let e = e.strip_prefix("www.").unwrap_or(&e).trim_matches('.');
            (!e.is_empty()).then(|| e.to_owned())
        })
        .collect()
}
