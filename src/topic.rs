//! Topic hint for a gold query.
//!
//! The topic is recorded in logs and the debug snapshot. It does not scope
//! the trust table, which is always the union of every topic section.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic labels, matching the section keys of the trust configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    PublicHealth,
    Finance,
    Politics,
    Technology,
    Sports,
    Climate,
}

/// Keyword groups in match order; the first group with a hit wins.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::PublicHealth,
        &["health", "medical", "medicine", "disease", "treatment"],
    ),
    (Topic::Finance, &["finance", "money", "investment", "economy"]),
    (Topic::Politics, &["politics", "government", "election"]),
    (Topic::Technology, &["technology", "tech", "software"]),
    (Topic::Sports, &["sports", "game", "athletic"]),
    (
        Topic::Climate,
        &["climate", "environment", "global warming"],
    ),
];

impl Topic {
    /// Configuration key for this topic.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PublicHealth => "public_health",
            Self::Finance => "finance",
            Self::Politics => "politics",
            Self::Technology => "technology",
            Self::Sports => "sports",
            Self::Climate => "climate",
        }
    }

    /// Pick a topic by substring containment on the lowercased query.
    ///
    /// Falls back to [`Topic::PublicHealth`] when nothing matches.
    pub fn extract(query: &str) -> Self {
        let lower = query.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(Self::PublicHealth, |(topic, _)| *topic)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
