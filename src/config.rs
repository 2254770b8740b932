//! Configuration types for a source discovery run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FinderError, Result};

/// Top-level configuration for [`crate::SourceFinder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Path to the domain trust JSON (`{topic: {reliable, misleading}}`).
    pub trust_config_path: PathBuf,
    /// Write the pre-pairing snapshot to `snapshot_path`.
    pub write_snapshot: bool,
    /// Where the pre-pairing snapshot is written.
    pub snapshot_path: PathBuf,
    /// Results requested from the search provider per query.
    pub max_results_per_query: usize,
    /// Hard wall-clock limit for one page extraction, in seconds.
    pub extract_timeout_secs: u64,
    /// Minimum extracted text length, in characters.
    pub min_text_chars: usize,
    /// Minimum relevance score (inclusive) for a source to be kept.
    pub min_relevance: f64,
    /// Characters of extracted text stored on each source.
    pub stored_text_chars: usize,
    /// Skip URLs already attempted earlier in the run.
    pub dedupe_urls: bool,
    /// Web search / fetch settings.
    pub search: SearchSettings,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            trust_config_path: PathBuf::from("domain_trust_config.json"),
            write_snapshot: true,
            snapshot_path: PathBuf::from("scraped_sources.json"),
            max_results_per_query: 15,
            extract_timeout_secs: 10,
            min_text_chars: 400,
            min_relevance: 0.35,
            stored_text_chars: 1000,
            dedupe_urls: true,
            search: SearchSettings::default(),
        }
    }
}

/// HTTP behaviour of the production search and extraction collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Ask the engine for safe search filtering.
    pub safe_search: bool,
    /// Fixed User-Agent. `None` rotates through browser UAs.
    pub user_agent: Option<String>,
    /// Search endpoint override (tests point this at a local server).
    pub endpoint: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            safe_search: false,
            user_agent: None,
            endpoint: None,
        }
    }
}

impl FinderConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FinderError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.max_results_per_query == 0 {
            return Err(FinderError::Config(
                "max_results_per_query must be greater than 0".into(),
            ));
        }
        if self.extract_timeout_secs == 0 {
            return Err(FinderError::Config(
                "extract_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.stored_text_chars == 0 {
            return Err(FinderError::Config(
                "stored_text_chars must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_relevance) {
            return Err(FinderError::Config(
                "min_relevance must be within [0, 1]".into(),
            ));
        }
        if self.search.timeout_secs == 0 {
            return Err(FinderError::Config(
                "search.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Per-URL extraction deadline.
    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    /// Translate into the web layer's configuration.
    pub fn search_config(&self) -> source_search::SearchConfig {
        let mut config = source_search::SearchConfig {
            max_results: self.max_results_per_query,
            timeout_seconds: self.search.timeout_secs,
            safe_search: self.search.safe_search,
            user_agent: self.search.user_agent.clone(),
            ..Default::default()
        };
        if let Some(endpoint) = &self.search.endpoint {
            config.endpoint = endpoint.clone();
        }
        config
    }
}
