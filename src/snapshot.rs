//! Debug snapshot of the accepted sources, taken before pairing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::error::{FinderError, Result};
use crate::source::{CollectionStats, Source};
use crate::topic::Topic;

/// Everything collected in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub gold_query: String,
    pub topic: Topic,
    pub collection_stats: CollectionStats,
    pub sources: Vec<Source>,
    pub timestamp: DateTime<Utc>,
}

impl SourceSnapshot {
    pub fn new(gold_query: &str, topic: Topic, sources: Vec<Source>) -> Self {
        Self {
            gold_query: gold_query.to_owned(),
            topic,
            collection_stats: CollectionStats::from_sources(&sources),
            sources,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for run snapshots. Failures are reported, never fatal to the run.
pub trait SnapshotSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be stored.
    fn write(&self, snapshot: &SourceSnapshot) -> Result<()>;
}

/// Writes pretty-printed JSON to a file, replacing any previous snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    path: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn write(&self, snapshot: &SourceSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                FinderError::Snapshot(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, json).map_err(|e| {
            FinderError::Snapshot(format!("cannot write {}: {e}", self.path.display()))
        })?;
        info!(
            path = %self.path.display(),
            count = snapshot.sources.len(),
            "snapshot written"
        );
        Ok(())
    }
}

/// Keeps snapshots in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotSink {
    snapshots: Arc<Mutex<Vec<SourceSnapshot>>>,
}

impl MemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every snapshot written so far, oldest first.
    pub fn snapshots(&self) -> Vec<SourceSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotSink for MemorySnapshotSink {
    fn write(&self, snapshot: &SourceSnapshot) -> Result<()> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
        Ok(())
    }
}

/// Discards snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSnapshotSink;

impl SnapshotSink for NoopSnapshotSink {
    fn write(&self, _snapshot: &SourceSnapshot) -> Result<()> {
        Ok(())
    }
}
