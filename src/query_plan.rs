//! Search query expansion of the gold query.

use crate::source::Category;

/// Suffixes steering results toward trustworthy domains.
const RELIABLE_SUFFIXES: &[&str] = &["", "guidelines", "research", "government", "academic"];

/// Suffixes steering results toward forums, social media and fringe sites.
const UNRELIABLE_SUFFIXES: &[&str] = &[
    "",
    "reddit",
    "twitter",
    "natural medicine",
    "alternative treatment",
    "conspiracy",
    "natural news",
];

/// Ordered search queries for each target category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub reliable: Vec<String>,
    pub unreliable: Vec<String>,
}

impl QueryPlan {
    /// Expand `gold_query` through the fixed templates.
    pub fn for_query(gold_query: &str) -> Self {
        let q = gold_query.trim();
        Self {
            reliable: expand(q, RELIABLE_SUFFIXES),
            unreliable: expand(q, UNRELIABLE_SUFFIXES),
        }
    }

    /// Every query with the category it targets, reliable first.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.reliable
            .iter()
            .map(|q| (Category::Reliable, q.as_str()))
            .chain(
                self.unreliable
                    .iter()
                    .map(|q| (Category::Unreliable, q.as_str())),
            )
    }

    /// Total number of queries.
    pub fn len(&self) -> usize {
        self.reliable.len() + self.unreliable.len()
    }

    /// `true` when the plan holds no queries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn expand(query: &str, suffixes: &[&str]) -> Vec<String> {
    suffixes
        .iter()
        .map(|suffix| {
            if suffix.is_empty() {
                query.to_owned()
            } else {
                format!("{query} {suffix}")
            }
        })
        .collect()
}
